//! Neighbor generation by pop-and-reinsert.
//!
//! A neighbor is produced by removing one variable and reinserting it
//! elsewhere. Everything between the two positions shifts by one slot, so a
//! single move can change the variable's relative order with several others.
//! This is the same move as the insert mutation used by permutation GAs.

use rand::Rng;

use crate::error::{BetweennessError, Result};
use crate::ordering::Ordering;

/// Remove the element at `from`, then insert it at index `to` of the
/// shortened sequence. After the move the element sits at `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertMove {
    pub from: usize,
    pub to: usize,
}

impl InsertMove {
    /// Draws `from != to` uniformly from `0..n`.
    ///
    /// # Errors
    ///
    /// [`BetweennessError::DegenerateInstance`] if `n < 2`.
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Result<Self> {
        if n < 2 {
            return Err(BetweennessError::DegenerateInstance { variables: n });
        }
        let from = rng.random_range(0..n);
        let mut to = rng.random_range(0..n - 1);
        if to >= from {
            to += 1;
        }
        Ok(Self { from, to })
    }

    /// The move that undoes this one.
    pub fn inverse(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }

    /// Applies the move to a plain sequence.
    ///
    /// # Complexity
    /// O(n) due to element shifting
    pub fn apply_to<T>(self, items: &mut Vec<T>) {
        let item = items.remove(self.from);
        items.insert(self.to, item);
    }
}

/// Returns a random neighbor of `ordering` differing in exactly one
/// variable's position.
///
/// # Errors
///
/// [`BetweennessError::DegenerateInstance`] if the ordering has fewer
/// than two variables.
pub fn neighbor<R: Rng>(ordering: &Ordering, rng: &mut R) -> Result<Ordering> {
    let mv = InsertMove::random(ordering.len(), rng)?;
    let mut next = ordering.clone();
    next.apply(mv);
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::VarId;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_random_move_endpoints_distinct() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let mv = InsertMove::random(5, &mut rng).unwrap();
            assert_ne!(mv.from, mv.to);
            assert!(mv.from < 5 && mv.to < 5);
        }
    }

    #[test]
    fn test_random_move_two_elements_swaps() {
        let mut rng = StdRng::seed_from_u64(7);
        let ordering = Ordering::identity(2);
        let next = neighbor(&ordering, &mut rng).unwrap();
        assert_eq!(next.as_slice(), &[VarId::new(1), VarId::new(0)]);
    }

    #[test]
    fn test_random_move_covers_every_pair() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            let mv = InsertMove::random(4, &mut rng).unwrap();
            seen.insert((mv.from, mv.to));
        }
        assert_eq!(seen.len(), 12);
    }

    #[test]
    fn test_degenerate_instance() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in 0..2 {
            let err = neighbor(&Ordering::identity(n), &mut rng).unwrap_err();
            assert!(matches!(
                err,
                BetweennessError::DegenerateInstance { variables } if variables == n
            ));
        }
    }

    #[test]
    fn test_apply_to_shifts_intermediate_elements() {
        let mut items = vec!['a', 'b', 'c', 'd', 'e'];
        InsertMove { from: 0, to: 3 }.apply_to(&mut items);
        assert_eq!(items, vec!['b', 'c', 'd', 'a', 'e']);
    }

    proptest! {
        #[test]
        fn prop_neighbor_is_different_permutation(n in 2usize..30, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let ordering = Ordering::identity(n);
            let next = neighbor(&ordering, &mut rng).unwrap();

            let mut sorted: Vec<VarId> = next.iter().collect();
            sorted.sort();
            prop_assert_eq!(sorted.as_slice(), ordering.as_slice());
            prop_assert_ne!(&next, &ordering);

            let displaced: Vec<usize> = (0..n)
                .filter(|&i| next.get(i) != ordering.get(i))
                .collect();
            prop_assert!(!displaced.is_empty());
        }
    }
}
