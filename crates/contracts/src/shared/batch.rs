use serde::{Deserialize, Serialize};

/// Outcome of one member of a request batch.
///
/// Serialized as `{"status": "ok", "value": ...}` or
/// `{"status": "error", "reason": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Settled<T> {
    Ok {
        value: T,
    },
    Error {
        reason: String,
        /// HTTP status code when the transport reported one
        #[serde(default, skip_serializing_if = "Option::is_none")]
        http_status: Option<u16>,
    },
}

impl<T> Settled<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Settled::Ok { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Settled::Ok { value } => Some(value),
            Settled::Error { .. } => None,
        }
    }
}

/// Aggregate state of a settled batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    AllOk,
    PartialOk,
    AllRejected,
    /// Batch had no members
    Empty,
}

/// Page display state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    Idle,
    Loading,
    /// At least one request succeeded; `partial` is set when some failed
    Succeeded { partial: bool },
    /// Every request failed
    Failed,
}

impl LoadState {
    pub fn from_status(status: BatchStatus) -> Self {
        match status {
            BatchStatus::AllOk | BatchStatus::Empty => LoadState::Succeeded { partial: false },
            BatchStatus::PartialOk => LoadState::Succeeded { partial: true },
            BatchStatus::AllRejected => LoadState::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_settled_wire_shape() {
        let ok: Settled<i32> = Settled::Ok { value: 7 };
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"status": "ok", "value": 7})
        );

        let err: Settled<i32> = Settled::Error {
            reason: "HTTP 500".to_string(),
            http_status: None,
        };
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"status": "error", "reason": "HTTP 500"})
        );
    }

    #[test]
    fn test_load_state_from_status() {
        assert_eq!(
            LoadState::from_status(BatchStatus::PartialOk),
            LoadState::Succeeded { partial: true }
        );
        assert_eq!(LoadState::from_status(BatchStatus::AllRejected), LoadState::Failed);
    }
}
