//! API utilities for dashboard-backend communication
//!
//! Provides the API configuration value and helpers for constructing request
//! URLs with query parameters.

use serde::Deserialize;

/// Backend address used when no configuration is supplied.
pub const DEFAULT_API_BASE: &str = "http://localhost:8001";

/// Connection settings for the aggregate API.
///
/// Resolved once by the host (config file, environment) and injected into the
/// fetcher at construction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout. `None` keeps the transport default (no timeout).
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_secs: None,
        }
    }

    /// Build a full API URL from a path
    ///
    /// # Example
    /// ```rust
    /// use dashboard_client::shared::api_utils::ApiConfig;
    ///
    /// let config = ApiConfig::new("http://localhost:8001/");
    /// assert_eq!(
    ///     config.api_url("/api/dashboard/ops/kpis"),
    ///     "http://localhost:8001/api/dashboard/ops/kpis"
    /// );
    /// ```
    pub fn api_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

/// Scalar query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Flag(bool),
}

impl QueryValue {
    pub fn render(&self) -> String {
        match self {
            QueryValue::Text(s) => s.clone(),
            QueryValue::Integer(i) => i.to_string(),
            QueryValue::Number(n) => n.to_string(),
            QueryValue::Flag(b) => b.to_string(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Integer(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Integer(value as i64)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Number(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Flag(value)
    }
}

/// Flat mapping of query parameters. Unset (`None`) entries are never sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, Option<QueryValue>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing an earlier value under the same key
    pub fn set(self, key: &str, value: impl Into<QueryValue>) -> Self {
        self.set_opt(key, Some(value))
    }

    pub fn set_opt<V: Into<QueryValue>>(mut self, key: &str, value: Option<V>) -> Self {
        let value = value.map(Into::into);
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_ref())
            .map(QueryValue::render)
    }

    /// Parameters that will actually be sent, in insertion order
    pub fn present(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.clone(), v.render())))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_none())
    }
}

/// Full request URL with the encoded query string
pub fn build_url(config: &ApiConfig, path: &str, params: &QueryParams) -> String {
    let url = config.api_url(path);
    let query: Vec<String> = params
        .present()
        .into_iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(&k), urlencoding::encode(&v)))
        .collect();

    if query.is_empty() {
        url
    } else {
        format!("{}?{}", url, query.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_joins_slashes() {
        let config = ApiConfig::new("http://127.0.0.1:8001/");
        assert_eq!(config.api_url("/api/x"), "http://127.0.0.1:8001/api/x");
        assert_eq!(config.api_url("api/x"), "http://127.0.0.1:8001/api/x");
    }

    #[test]
    fn test_unset_params_are_omitted() {
        let params = QueryParams::new()
            .set("start_date", "2024-01-01")
            .set_opt::<&str>("platform", None)
            .set("top_n", 5i64);

        assert_eq!(
            params.present(),
            vec![
                ("start_date".to_string(), "2024-01-01".to_string()),
                ("top_n".to_string(), "5".to_string()),
            ]
        );
        assert_eq!(params.get("platform"), None);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let params = QueryParams::new()
            .set("freq", "M")
            .set("platform", "iFood")
            .set("freq", "D");

        assert_eq!(params.get("freq").as_deref(), Some("D"));
        assert_eq!(
            params.present(),
            vec![
                ("freq".to_string(), "D".to_string()),
                ("platform".to_string(), "iFood".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_url_encodes_values() {
        let config = ApiConfig::default();
        let params = QueryParams::new()
            .set("macro_bairro", "Zona Sul")
            .set("score_min", 4.5)
            .set("active", true);

        assert_eq!(
            build_url(&config, "/api/dashboard/finance/kpis", &params),
            "http://localhost:8001/api/dashboard/finance/kpis?macro_bairro=Zona%20Sul&score_min=4.5&active=true"
        );
        assert_eq!(
            build_url(&config, "/api/dashboard/meta/platforms", &QueryParams::new()),
            "http://localhost:8001/api/dashboard/meta/platforms"
        );
    }
}
