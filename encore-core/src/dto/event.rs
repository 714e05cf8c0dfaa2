//! Push event payloads

use serde::{Deserialize, Serialize};

/// Status value carried by a finished job
pub const COMPLETED: &str = "completed";

/// Job notification pushed over the metrics event stream
///
/// `job_type` is the job id the event correlates to. Fields beyond
/// `type` and `status` are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEvent {
    #[serde(rename = "type")]
    pub job_type: String,
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl JobEvent {
    pub fn parse(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    pub fn is_completed(&self) -> bool {
        self.status == COMPLETED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_completed_event() {
        let event =
            JobEvent::parse(r#"{"type":"spotify-followers","status":"completed","count":12}"#)
                .unwrap();
        assert_eq!(event.job_type, "spotify-followers");
        assert!(event.is_completed());
        assert_eq!(event.extra.get("count"), Some(&serde_json::json!(12)));
    }

    #[test]
    fn test_other_status_is_not_completed() {
        let event = JobEvent::parse(r#"{"type":"youtube-metrics","status":"started"}"#).unwrap();
        assert!(!event.is_completed());
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(JobEvent::parse("not json").is_err());
        assert!(JobEvent::parse(r#"{"status":"completed"}"#).is_err());
        assert!(JobEvent::parse(r#"["completed"]"#).is_err());
    }
}
