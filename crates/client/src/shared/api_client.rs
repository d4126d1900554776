use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::api_utils::{build_url, ApiConfig, QueryParams};

/// Transport-level failure of one aggregate request
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("HTTP {status} while fetching {path}")]
    Status { status: u16, path: String },

    #[error("Network error while fetching {path}: {message}")]
    Network { path: String, message: String },

    #[error("Failed to parse response from {path}: {message}")]
    Decode { path: String, message: String },
}

impl FetchError {
    /// HTTP status code, when the server answered
    pub fn http_status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Capability to GET an aggregate endpoint and return its parsed JSON.
///
/// The core depends only on this contract, never on a concrete endpoint
/// catalogue or transport.
#[async_trait]
pub trait AggregateFetcher: Send + Sync {
    async fn fetch_aggregate(&self, path: &str, params: &QueryParams) -> Result<Value, FetchError>;
}

/// [`AggregateFetcher`] over HTTP
pub struct HttpFetcher {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpFetcher {
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| FetchError::Network {
            path: config.base_url.clone(),
            message: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

#[async_trait]
impl AggregateFetcher for HttpFetcher {
    async fn fetch_aggregate(&self, path: &str, params: &QueryParams) -> Result<Value, FetchError> {
        let url = build_url(&self.config, path, params);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Network {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("HTTP {} for {}", status.as_u16(), url);
            return Err(FetchError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        response.json::<Value>().await.map_err(|e| FetchError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_is_exposed_only_for_server_answers() {
        let status = FetchError::Status {
            status: 400,
            path: "/api/dashboard/finance/kpis".to_string(),
        };
        assert_eq!(status.http_status(), Some(400));
        assert_eq!(
            status.to_string(),
            "HTTP 400 while fetching /api/dashboard/finance/kpis"
        );

        let network = FetchError::Network {
            path: "/api/x".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(network.http_status(), None);
    }

    #[test]
    fn test_http_fetcher_keeps_injected_config() {
        let fetcher = HttpFetcher::new(ApiConfig::new("http://10.0.0.5:8001")).unwrap();
        assert_eq!(fetcher.config().base_url, "http://10.0.0.5:8001");
    }
}
