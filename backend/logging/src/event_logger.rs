//! Print Event Logger
//!
//! Structured pipeline events written through `tracing` under the
//! `print_events` target, so they land in the rolling NDJSON log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrintEvent {
    Received {
        sender: String,
        bytes: usize,
        has_caption: bool,
    },
    Unauthorized {
        sender: String,
    },
    DecodeFailed {
        error_msg: String,
    },
    Submitted {
        job_id: String,
        copies: u32,
    },
    Rejected {
        reason: String,
    },
    MaxCopiesChanged {
        sender: String,
        old: u32,
        new: u32,
    },
}

impl PrintEvent {
    fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized { .. } | Self::DecodeFailed { .. } | Self::Rejected { .. }
        )
    }
}

#[derive(Debug, Serialize)]
pub struct PrintEventEntry {
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: PrintEvent,
}

pub struct PrintEventLogger;

impl PrintEventLogger {
    /// Redacts free-text fields and emits the event.
    pub fn log_event(request_id: Uuid, event: PrintEvent) -> PrintEventEntry {
        let entry = PrintEventEntry {
            request_id,
            timestamp: Utc::now(),
            event: redact_event(event),
        };

        if entry.event.is_warning() {
            warn!(target: "print_events", event = ?entry, "Print event");
        } else {
            info!(target: "print_events", event = ?entry, "Print event");
        }
        entry
    }
}

fn redact_event(mut event: PrintEvent) -> PrintEvent {
    match &mut event {
        PrintEvent::DecodeFailed { error_msg } => *error_msg = redact_sensitive_data(error_msg),
        PrintEvent::Rejected { reason } => *reason = redact_sensitive_data(reason),
        _ => {}
    }
    event
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_reason_is_redacted() {
        let entry = PrintEventLogger::log_event(
            Uuid::new_v4(),
            PrintEvent::Rejected {
                reason: "bot123456789:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw unreachable".into(),
            },
        );
        match entry.event {
            PrintEvent::Rejected { reason } => assert!(reason.contains("[REDACTED_TOKEN]")),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(PrintEvent::Submitted {
            job_id: "label-3".into(),
            copies: 2,
        })
        .unwrap();
        assert_eq!(json["type"], "submitted");
        assert_eq!(json["copies"], 2);
    }
}
