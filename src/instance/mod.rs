//! Knapsack-with-conflicts instances.
//!
//! # Key Components
//!
//! - [`Instance`]: validated, immutable item data, capacity and conflict pairs
//! - [`parse_file`] / [`parse_str`]: reader for the `param`/`set E` text format
//! - [`generate`]: seeded random instances

mod generator;
mod parser;
mod types;

pub use generator::{generate, GeneratorConfig};
pub use parser::{parse_file, parse_str, ParseMode, ParsedInstance};
pub use types::{Conflict, Instance};
