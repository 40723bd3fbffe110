//! Reader for the AMPL-style instance files of the knapsack-with-conflicts
//! benchmark families.
//!
//! ```text
//! param n := 4;
//! param c := 10;
//! param : V : p w :=
//! 0 3 2
//! 1 4 3
//! 2 5 4
//! 3 8 5
//! ;
//! set E :=
//! 0 1
//! 2 3
//! ;
//! ```
//!
//! Conflict endpoints refer to the item ids of the `V` section and are mapped
//! to zero-based positions in the order the items appear.

use std::collections::HashMap;
use std::path::Path;

use log::{debug, warn};

use super::types::Instance;
use crate::error::ParseError;

const ITEM_COUNT: &str = "param n :=";
const CAPACITY: &str = "param c :=";
const ITEM_SECTION: &str = "param : V : p w :=";
const CONFLICT_SECTION: &str = "set E :=";

/// How malformed data lines are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Skip the line and log a warning.
    #[default]
    Lenient,
    /// Fail with [`ParseError::MalformedLine`].
    Strict,
}

/// Result of reading an instance file.
#[derive(Debug, Clone)]
pub struct ParsedInstance {
    /// File name or caller-supplied label.
    pub name: String,
    /// Item count announced by `param n`, if present.
    pub declared_items: Option<usize>,
    /// Data lines dropped in lenient mode.
    pub skipped_lines: usize,
    /// The validated instance.
    pub instance: Instance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Items,
    Conflicts,
}

/// Reads and parses an instance file.
pub fn parse_file(path: impl AsRef<Path>, mode: ParseMode) -> Result<ParsedInstance, ParseError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    parse_str(&path.display().to_string(), &text, mode)
}

/// Parses instance text. `name` only labels log records and the result.
pub fn parse_str(name: &str, text: &str, mode: ParseMode) -> Result<ParsedInstance, ParseError> {
    let mut section = Section::Header;
    let mut declared_items: Option<usize> = None;
    let mut capacity: Option<i64> = None;
    let mut ids: Vec<i64> = Vec::new();
    let mut values: Vec<i64> = Vec::new();
    let mut weights: Vec<i64> = Vec::new();
    let mut edges: Vec<(usize, i64, i64)> = Vec::new();
    let mut skipped_lines = 0usize;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix(ITEM_COUNT) {
            let n = parse_scalar(rest, line_no)?;
            declared_items = Some(usize::try_from(n).map_err(|_| ParseError::MalformedLine {
                line: line_no,
                content: line.clone(),
            })?);
            continue;
        }
        if let Some(rest) = line.strip_prefix(CAPACITY) {
            capacity = Some(parse_scalar(rest, line_no)?);
            continue;
        }
        if line.starts_with(ITEM_SECTION) {
            section = Section::Items;
            continue;
        }
        if line.starts_with(CONFLICT_SECTION) {
            section = Section::Conflicts;
            continue;
        }
        if line == ";" {
            section = Section::Header;
            continue;
        }

        let (data, closes) = match line.strip_suffix(';') {
            Some(data) => (data.trim(), true),
            None => (line.as_str(), false),
        };

        match section {
            Section::Header => debug!("{name}:{line_no}: ignoring '{line}'"),
            Section::Items => match parse_ints::<3>(data) {
                Some([id, value, weight]) => {
                    ids.push(id);
                    values.push(value);
                    weights.push(weight);
                }
                None => reject(name, line_no, &line, mode, &mut skipped_lines)?,
            },
            Section::Conflicts => match parse_ints::<2>(data) {
                Some([i, j]) => edges.push((line_no, i, j)),
                None => reject(name, line_no, &line, mode, &mut skipped_lines)?,
            },
        }

        if closes {
            section = Section::Header;
        }
    }

    let capacity = capacity.ok_or(ParseError::MissingCapacity)?;

    if let Some(n) = declared_items {
        if n != values.len() {
            warn!(
                "{name}: parsed {} items, but n states {n}",
                values.len()
            );
        }
    }

    let mut positions: HashMap<i64, usize> = HashMap::with_capacity(ids.len());
    for (position, &id) in ids.iter().enumerate() {
        if positions.insert(id, position).is_some() {
            warn!("{name}: item id {id} appears more than once; conflicts use its last position");
        }
    }

    let mut conflicts = Vec::with_capacity(edges.len());
    for (line_no, i, j) in edges {
        match (positions.get(&i), positions.get(&j)) {
            (Some(&a), Some(&b)) => conflicts.push((a, b)),
            _ => {
                let id = if positions.contains_key(&i) { j } else { i };
                match mode {
                    ParseMode::Strict => return Err(ParseError::UnknownItem { line: line_no, id }),
                    ParseMode::Lenient => {
                        warn!("{name}:{line_no}: conflict references unknown item id {id}, skipped");
                        skipped_lines += 1;
                    }
                }
            }
        }
    }

    let instance = Instance::new(weights, values, capacity, conflicts)?;
    debug!(
        "{name}: {} items, capacity {}, {} conflicts",
        instance.num_items(),
        instance.capacity(),
        instance.conflicts().len()
    );

    Ok(ParsedInstance {
        name: name.to_string(),
        declared_items,
        skipped_lines,
        instance,
    })
}

fn parse_scalar(rest: &str, line: usize) -> Result<i64, ParseError> {
    let token = rest.replace(';', "");
    let token = token.trim();
    token.parse().map_err(|_| ParseError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

/// Exactly `N` whitespace separated integers, or `None`.
fn parse_ints<const N: usize>(data: &str) -> Option<[i64; N]> {
    let mut out = [0i64; N];
    let mut tokens = data.split_whitespace();
    for slot in out.iter_mut() {
        *slot = tokens.next()?.parse().ok()?;
    }
    match tokens.next() {
        Some(_) => None,
        None => Some(out),
    }
}

fn reject(
    name: &str,
    line: usize,
    content: &str,
    mode: ParseMode,
    skipped: &mut usize,
) -> Result<(), ParseError> {
    match mode {
        ParseMode::Strict => Err(ParseError::MalformedLine {
            line,
            content: content.to_string(),
        }),
        ParseMode::Lenient => {
            warn!("{name}:{line}: skipping malformed entry '{content}'");
            *skipped += 1;
            Ok(())
        }
    }
}
