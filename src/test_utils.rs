//! Brute-force reference used to check the solver on small instances.

use crate::instance::Instance;

/// Best total value over all feasible subsets. Exponential; keep `n` small.
pub(crate) fn brute_force(instance: &Instance) -> i64 {
    let all: Vec<usize> = (0..instance.num_items()).collect();
    brute_force_restricted(instance, &[], &all)
}

/// Best total value over feasible selections `fixed ∪ T` with `T ⊆ free`.
pub(crate) fn brute_force_restricted(instance: &Instance, fixed: &[usize], free: &[usize]) -> i64 {
    assert!(free.len() <= 24, "brute force over {} items", free.len());
    let mut best = i64::MIN;
    let mut selection = Vec::with_capacity(fixed.len() + free.len());
    for mask in 0u32..(1u32 << free.len()) {
        selection.clear();
        selection.extend_from_slice(fixed);
        selection.extend(
            free.iter()
                .enumerate()
                .filter(|&(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, &i)| i),
        );
        if instance.check_selection(&selection).is_ok() {
            best = best.max(instance.evaluate(&selection).1);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brute_force_scenario() {
        let instance = Instance::new(
            vec![2, 3, 4, 5, 9],
            vec![3, 4, 5, 8, 10],
            10,
            vec![(0, 1), (2, 3)],
        )
        .unwrap();
        assert_eq!(brute_force(&instance), 12);
        assert_eq!(brute_force_restricted(&instance, &[4], &[0, 1, 2, 3]), 10);
    }

    #[test]
    fn test_brute_force_empty() {
        let instance = Instance::new(vec![], vec![], 0, Vec::new()).unwrap();
        assert_eq!(brute_force(&instance), 0);
    }
}
