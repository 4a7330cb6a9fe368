//! Print-queue submission: the dispatcher that bounds every call with a
//! timeout, and the CUPS `lp` backend it normally drives.

pub mod cups;
pub mod dispatcher;

pub use cups::{LpBackend, LpConfig};
pub use dispatcher::PrintDispatcher;
