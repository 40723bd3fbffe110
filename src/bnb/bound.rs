//! Fractional relaxation bound.
//!
//! Items are visited in non-increasing value/weight order; whole items are
//! taken while they fit and the first one that does not fit contributes the
//! fraction `value * residual / weight`, rounded up. Conflicts among the
//! remaining items are ignored, so the result is never below the best
//! integral value reachable from the node.
//!
//! All arithmetic is integral; the rounding up is exact.

use super::search::Item;

/// Upper bound on the value the items in `items[start..]` can still add
/// within `residual` capacity.
///
/// Items with `blocked[k] > 0` conflict with an already picked item and are
/// skipped.
pub(crate) fn fractional_bound(items: &[Item], start: usize, residual: i64, blocked: &[u32]) -> i64 {
    let mut remaining = residual;
    let mut bound = 0i64;

    for (item, &block) in items[start..].iter().zip(&blocked[start..]) {
        if block > 0 {
            continue;
        }
        if item.weight <= remaining {
            remaining -= item.weight;
            bound += item.value;
        } else {
            bound += ceil_fraction(item.value, remaining, item.weight);
            break;
        }
    }
    bound
}

/// `ceil(value * num / den)` for `0 <= num < den`.
fn ceil_fraction(value: i64, num: i64, den: i64) -> i64 {
    let product = value as i128 * num as i128;
    let den = den as i128;
    ((product + den - 1) / den) as i64
}
