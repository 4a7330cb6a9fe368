pub mod admin;
pub mod copies;
pub mod pipeline;

pub use admin::{AdminControl, MaxCopiesChange};
pub use copies::{apply_policy, resolve, resolve_copies, CopyResolution};
pub use pipeline::{PrintPipeline, PrintReceipt};
