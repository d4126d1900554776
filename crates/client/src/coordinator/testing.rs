//! In-memory [`AggregateFetcher`] for tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::shared::api_client::{AggregateFetcher, FetchError};
use crate::shared::api_utils::QueryParams;

/// Answers by path. Unknown paths fail with HTTP 404.
#[derive(Default)]
pub struct FakeFetcher {
    responses: HashMap<String, Value>,
    failures: HashMap<String, u16>,
    /// Requests carrying `param=value` sleep before answering
    slow_when: Option<(String, String, Duration)>,
    calls: Mutex<Vec<(String, QueryParams)>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, path: &str, value: Value) -> Self {
        self.responses.insert(path.to_string(), value);
        self
    }

    pub fn fail(mut self, path: &str, status: u16) -> Self {
        self.failures.insert(path.to_string(), status);
        self
    }

    pub fn slow_when(mut self, param: &str, value: &str, delay: Duration) -> Self {
        self.slow_when = Some((param.to_string(), value.to_string(), delay));
        self
    }

    pub fn calls(&self) -> Vec<(String, QueryParams)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn params_for(&self, path: &str) -> Option<QueryParams> {
        self.calls()
            .into_iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, params)| params)
    }
}

#[async_trait]
impl AggregateFetcher for FakeFetcher {
    async fn fetch_aggregate(&self, path: &str, params: &QueryParams) -> Result<Value, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_string(), params.clone()));

        if let Some((param, value, delay)) = &self.slow_when {
            if params.get(param).as_deref() == Some(value.as_str()) {
                tokio::time::sleep(*delay).await;
            }
        }

        if let Some(status) = self.failures.get(path) {
            return Err(FetchError::Status {
                status: *status,
                path: path.to_string(),
            });
        }
        self.responses.get(path).cloned().ok_or_else(|| FetchError::Status {
            status: 404,
            path: path.to_string(),
        })
    }
}
