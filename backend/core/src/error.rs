use thiserror::Error;

use crate::types::RejectReason;

/// Top-level error type for the Telefax print bridge.
///
/// Every variant is terminal for the request that produced it.
#[derive(Debug, Error)]
pub enum TelefaxError {
    #[error("sender {sender} is not authorized")]
    Unauthorized { sender: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("image decode failed: {0}")]
    Decode(String),

    #[error("image encode failed: {0}")]
    Encode(String),

    #[error("print job rejected: {reason}")]
    PrintRejected { reason: RejectReason },

    #[error("requested {requested} copies exceeds the maximum of {max}")]
    CopyLimitExceeded { requested: u64, max: u32 },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TelefaxError {
    /// Text that is safe to send back to the chat that caused the error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { .. } => "Sorry, you are not authorized to use this printer.".to_string(),
            Self::InvalidArgument(msg) => msg.clone(),
            Self::Decode(_) => "Failed to process the image. Please send a JPEG, PNG, GIF, WebP or BMP picture.".to_string(),
            Self::Encode(_) => "Failed to prepare the image for printing.".to_string(),
            Self::PrintRejected { reason } => format!("Failed to send to printer: {reason}"),
            Self::CopyLimitExceeded { requested, max } => format!(
                "You asked for {requested} copies, but the maximum per request is {max}."
            ),
            Self::ConfigError(_) => "Printer is not configured. Please contact the administrator.".to_string(),
            Self::Other(_) => "An unexpected error occurred.".to_string(),
        }
    }

    /// Whether this error reflects a fault in the bridge itself rather than the request.
    pub fn is_system_fault(&self) -> bool {
        matches!(self, Self::Encode(_) | Self::ConfigError(_) | Self::Other(_))
    }
}
