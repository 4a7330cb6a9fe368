use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TelefaxError;

/// Opaque sender identity handed over by the messaging transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct SenderId(String);

impl SenderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SenderId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SenderId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<u64> for SenderId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A single inbound image event. Lives only for the duration of one pipeline run.
#[derive(Debug, Clone)]
pub struct PrintRequest {
    pub id: Uuid,
    pub sender: SenderId,
    pub image: Vec<u8>,
    pub caption: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl PrintRequest {
    pub fn new(sender: impl Into<SenderId>, image: Vec<u8>, caption: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: sender.into(),
            image,
            caption,
            received_at: Utc::now(),
        }
    }
}

/// Raster encoding handed to the print queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = TelefaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            other => Err(TelefaxError::InvalidArgument(format!(
                "unknown output format `{other}` (expected png or jpeg)"
            ))),
        }
    }
}

/// An encoded label image whose pixel size equals the configured canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelBitmap {
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub data: Vec<u8>,
}

/// A print job derived from a [`PrintRequest`]: one bitmap, `copies` duplicates.
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub bitmap: LabelBitmap,
    pub copies: u32,
    pub target_device: String,
}

impl PrintJob {
    pub fn new(
        bitmap: LabelBitmap,
        copies: u32,
        target_device: impl Into<String>,
    ) -> Result<Self, TelefaxError> {
        if copies == 0 {
            return Err(TelefaxError::InvalidArgument(
                "a print job needs at least one copy".into(),
            ));
        }
        let target_device = target_device.into();
        if target_device.trim().is_empty() {
            return Err(TelefaxError::ConfigError("no print device configured".into()));
        }
        Ok(Self {
            bitmap,
            copies,
            target_device,
        })
    }
}

/// Why the print backend declined a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "detail")]
pub enum RejectReason {
    /// The backend did not answer within the bounded interval.
    Timeout { after_secs: u64 },
    Unreachable(String),
    InvalidDevice(String),
    SpoolerFull(String),
    Backend(String),
}

impl RejectReason {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { after_secs } => write!(f, "print queue timed out after {after_secs}s"),
            Self::Unreachable(detail) => write!(f, "print queue unreachable ({detail})"),
            Self::InvalidDevice(device) => write!(f, "unknown printer `{device}`"),
            Self::SpoolerFull(detail) => write!(f, "printer is not accepting jobs ({detail})"),
            Self::Backend(detail) => write!(f, "{detail}"),
        }
    }
}

/// Typed result of one job submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum JobOutcome {
    Accepted { job_id: String },
    Rejected { reason: RejectReason },
}

impl JobOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// "1 copy" / "3 copies".
pub fn copies_label(copies: u32) -> String {
    if copies == 1 {
        "1 copy".to_string()
    } else {
        format!("{copies} copies")
    }
}
