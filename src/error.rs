//! Error types.
//!
//! One enum per concern: instance validation, solving, parsing, solution
//! verification and batch processing. A timed-out search is not an error;
//! it is reported through [`SolveStatus::FeasibleUnproven`](crate::bnb::SolveStatus).

use std::path::PathBuf;

use thiserror::Error;

/// A malformed instance, detected before any search work.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("weights has {weights} entries but values has {values}")]
    LengthMismatch { weights: usize, values: usize },
    #[error("capacity must be non-negative, got {0}")]
    NegativeCapacity(i64),
    #[error("weight of item {item} must be non-negative, got {weight}")]
    NegativeWeight { item: usize, weight: i64 },
    #[error("value of item {item} must be non-negative, got {value}")]
    NegativeValue { item: usize, value: i64 },
    #[error("conflict #{index} ({a}, {b}) references an item outside 0..{num_items}")]
    ConflictOutOfRange {
        index: usize,
        a: usize,
        b: usize,
        num_items: usize,
    },
}

/// Failure of a solve call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("invalid instance: {0}")]
    Invalid(#[from] ValidationError),
    #[error("arithmetic overflow while summing {what}")]
    Overflow { what: &'static str },
    #[error("search invariant violated: {0}")]
    Internal(String),
}

/// Failure to read an instance file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to read instance, more details: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: '{token}' is not an integer")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line}: malformed entry '{content}'")]
    MalformedLine { line: usize, content: String },
    #[error("no capacity declaration ('param c := ...;') found")]
    MissingCapacity,
    #[error("conflict on line {line} references unknown item id {id}")]
    UnknownItem { line: usize, id: i64 },
    #[error("parsed instance is invalid: {0}")]
    Invalid(#[from] ValidationError),
}

/// A selection that is not a feasible solution of its instance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolutionError {
    #[error("item {0} does not exist")]
    IndexOutOfRange(usize),
    #[error("item {0} is picked more than once")]
    Duplicate(usize),
    #[error("total weight {weight} exceeds capacity {capacity}")]
    OverCapacity { weight: i64, capacity: i64 },
    #[error("conflicting items {0} and {1} are both picked")]
    ConflictViolated(usize, usize),
    #[error("reported totals (weight {reported_weight}, value {reported_value}) differ from actual (weight {weight}, value {value})")]
    InconsistentTotals {
        reported_weight: i64,
        reported_value: i64,
        weight: i64,
        value: i64,
    },
}

/// Failure of one instance inside a batch, or of the batch setup itself.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("{path}: {source}")]
    Solve {
        path: PathBuf,
        #[source]
        source: SolveError,
    },
    #[error("{path}: reported solution failed verification: {source}")]
    Verify {
        path: PathBuf,
        #[source]
        source: SolutionError,
    },
    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}
