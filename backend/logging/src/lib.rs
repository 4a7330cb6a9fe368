//! Telemetry and structured logging for Telefax.
//!
//! Handles log redaction, JSON output, file rotation, and print event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{PrintEvent, PrintEventEntry, PrintEventLogger};
pub use logger::{init_console_logger, init_logger};
pub use redact::redact_sensitive_data;
