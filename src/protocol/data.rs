use serde::{Deserialize, Serialize};

use crate::domain::daemon::inbound::ReminderStatus;
use crate::domain::entity::ReminderKind;

/// A [`Protocol`] represents the underlying data type used by
/// the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Protocol {
    Request(Request),
    Response(Response),
}

/// A [`Request`] represents requests from a client. A missing `kind` means
/// every reminder, or for `Test` the first enabled one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum Request {
    Pause {
        #[serde(default)]
        kind: Option<ReminderKind>,
    },
    Resume {
        #[serde(default)]
        kind: Option<ReminderKind>,
    },
    Skip {
        kind: ReminderKind,
    },
    Query,
    Test {
        #[serde(default)]
        kind: Option<ReminderKind>,
    },
    Reload,
}

/// A [`Response`] represents a daemon's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum Response {
    Pause,
    Resume,
    Skip,
    Query {
        paused: bool,
        reminders: Vec<ReminderStatus>,
    },
    Test,
    Reload,
    Error {
        message: String,
    },
}

impl From<Request> for Protocol {
    fn from(value: Request) -> Self {
        Self::Request(value)
    }
}

impl From<Response> for Protocol {
    fn from(value: Response) -> Self {
        Self::Response(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::time::Duration;

    use crate::domain::entity::TimerStatus;

    #[test]
    fn protocol_deserialize_request() {
        let text = serde_json::json!({
            "type": "Request",
            "method": "Pause",
            "kind": "stand-sit"
        });
        let data = Protocol::Request(Request::Pause {
            kind: Some(ReminderKind::StandSit),
        });
        assert_eq!(serde_json::from_value::<Protocol>(text).unwrap(), data);

        let text = serde_json::json!({
            "type": "Request",
            "method": "Resume"
        });
        let data = Protocol::Request(Request::Resume { kind: None });
        assert_eq!(serde_json::from_value::<Protocol>(text).unwrap(), data);

        let text = serde_json::json!({
            "type": "Request",
            "method": "Test"
        });
        let data = Protocol::Request(Request::Test { kind: None });
        assert_eq!(serde_json::from_value::<Protocol>(text).unwrap(), data);
    }

    #[test]
    fn protocol_deserialize_response() {
        let text = serde_json::json!({
            "type": "Response",
            "method": "Query",
            "paused": false,
            "reminders": [
                {
                    "kind": "break",
                    "status": "running",
                    "interval": 25,
                    "remaining": {
                        "secs": 90,
                        "nanos": 0
                    }
                },
                {
                    "kind": "posture",
                    "status": "stopped",
                    "interval": null,
                    "remaining": null
                }
            ]
        });

        let data = Protocol::Response(Response::Query {
            paused: false,
            reminders: vec![
                ReminderStatus {
                    kind: ReminderKind::Break,
                    status: TimerStatus::Running,
                    interval: Some(25),
                    remaining: Some(Duration::from_secs(90)),
                },
                ReminderStatus {
                    kind: ReminderKind::Posture,
                    status: TimerStatus::Stopped,
                    interval: None,
                    remaining: None,
                },
            ],
        });

        assert_eq!(serde_json::from_value::<Protocol>(text).unwrap(), data);
    }

    #[test]
    fn protocol_deserialize_error_unknown_kind() {
        let text = serde_json::json!({
            "type": "Request",
            "method": "Skip",
            "kind": "nap"
        });
        assert!(serde_json::from_value::<Protocol>(text).is_err());
    }
}
