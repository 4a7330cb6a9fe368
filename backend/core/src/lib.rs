pub mod error;
pub mod limits;
pub mod traits;
pub mod types;

pub use error::TelefaxError;
pub use limits::{CopyLimitPolicy, LabelSpec, PrinterTarget, RuntimeConfig, SharedLimits, DEFAULT_MAX_COPIES};
pub use traits::{PrintBackend, ReplySink};
pub use types::{
    copies_label, JobOutcome, LabelBitmap, OutputFormat, PrintJob, PrintRequest, RejectReason, SenderId,
};
