use contracts::shared::batch::{BatchStatus, Settled};
use futures::future::join_all;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::shared::api_client::AggregateFetcher;
use crate::shared::api_utils::QueryParams;

/// One member of a request batch
#[derive(Debug, Clone, PartialEq)]
pub struct NamedRequest {
    pub name: String,
    pub path: String,
    pub params: QueryParams,
}

impl NamedRequest {
    pub fn new(name: &str, path: &str, params: QueryParams) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            params,
        }
    }
}

/// Settled outcomes of a batch, in request order.
///
/// Serializes as `{name: {"status": "ok", "value": ..} | {"status": "error", ..}}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    entries: Vec<(String, Settled<Value>)>,
}

impl BatchResult {
    pub fn from_entries(entries: Vec<(String, Settled<Value>)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&Settled<Value>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, outcome)| outcome)
    }

    /// Payload of a request that succeeded
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(Settled::value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Settled<Value>)> {
        self.entries.iter().map(|(n, o)| (n.as_str(), o))
    }

    pub fn status(&self) -> BatchStatus {
        let ok = self.entries.iter().filter(|(_, o)| o.is_ok()).count();
        match (ok, self.entries.len()) {
            (_, 0) => BatchStatus::Empty,
            (ok, total) if ok == total => BatchStatus::AllOk,
            (0, _) => BatchStatus::AllRejected,
            _ => BatchStatus::PartialOk,
        }
    }

    /// Names of the requests that failed
    pub fn failed(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, o)| !o.is_ok())
            .map(|(n, _)| n.as_str())
            .collect()
    }

    /// Outcomes of both batches, `self` first
    pub fn merge(mut self, other: BatchResult) -> BatchResult {
        self.entries.extend(other.entries);
        self
    }
}

impl Serialize for BatchResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, outcome) in &self.entries {
            map.serialize_entry(name, outcome)?;
        }
        map.end()
    }
}

/// Fire every request concurrently and wait until all have settled.
///
/// A failing request never aborts the others; the batch itself cannot fail.
pub async fn run_batch(fetcher: &dyn AggregateFetcher, requests: Vec<NamedRequest>) -> BatchResult {
    let pending = requests.into_iter().map(|request| async move {
        let outcome = match fetcher.fetch_aggregate(&request.path, &request.params).await {
            Ok(value) => Settled::Ok { value },
            Err(e) => {
                tracing::warn!("Request '{}' failed: {}", request.name, e);
                Settled::Error {
                    reason: e.to_string(),
                    http_status: e.http_status(),
                }
            }
        };
        (request.name, outcome)
    });

    let result = BatchResult::from_entries(join_all(pending).await);
    tracing::info!(
        "Batch settled: {} of {} requests succeeded",
        result.len() - result.failed().len(),
        result.len()
    );
    result
}
