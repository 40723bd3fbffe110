//! Batch solving of instance files.
//!
//! # Key Components
//!
//! - [`discover`]: glob patterns below a root directory to instance files
//! - [`BatchRunner`]: parse, solve and verify each file, recording failures
//!   per file instead of aborting
//! - [`BatchReport`]: per-file results and the end-of-run summary

mod discovery;
mod runner;

pub use discovery::{discover, DEFAULT_PATTERNS};
pub use runner::{verify, BatchConfig, BatchReport, BatchRunner, InstanceReport};
