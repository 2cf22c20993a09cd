//! Permutations of instance variables with an explicit position index.

use crate::error::{BetweennessError, Result};
use crate::instance::VarId;
use crate::neighbor::InsertMove;

/// A linear ordering of every instance variable.
///
/// Alongside the sequence it keeps the inverse map `positions[var] = index`,
/// so position lookups are O(1). Both are updated together by
/// [`Ordering::apply`]; only the slots between the move's endpoints are
/// touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    sequence: Vec<VarId>,
    positions: Vec<usize>,
}

impl Ordering {
    /// The ordering `#0, #1, ..., #(n-1)`.
    pub fn identity(n: usize) -> Self {
        Self {
            sequence: (0..n).map(VarId::new).collect(),
            positions: (0..n).collect(),
        }
    }

    /// Wraps a sequence, checking that it is a permutation of `0..len`.
    pub fn from_sequence(sequence: Vec<VarId>) -> Result<Self> {
        let n = sequence.len();
        let mut positions = vec![usize::MAX; n];
        for (i, var) in sequence.iter().enumerate() {
            let slot = positions.get_mut(var.index()).ok_or_else(|| {
                BetweennessError::InvalidInstance(format!(
                    "variable {var} out of range for an ordering of {n}"
                ))
            })?;
            if *slot != usize::MAX {
                return Err(BetweennessError::InvalidInstance(format!(
                    "variable {var} appears more than once"
                )));
            }
            *slot = i;
        }
        Ok(Self {
            sequence,
            positions,
        })
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn as_slice(&self) -> &[VarId] {
        &self.sequence
    }

    pub fn iter(&self) -> impl Iterator<Item = VarId> + '_ {
        self.sequence.iter().copied()
    }

    /// Variable at `index`.
    pub fn get(&self, index: usize) -> Option<VarId> {
        self.sequence.get(index).copied()
    }

    /// Index of `var`, or `None` if the ordering does not contain it.
    pub fn position(&self, var: VarId) -> Option<usize> {
        self.positions.get(var.index()).copied()
    }

    /// Applies a pop-and-reinsert move in place.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint is out of range.
    pub fn apply(&mut self, mv: InsertMove) {
        mv.apply_to(&mut self.sequence);
        let (lo, hi) = if mv.from <= mv.to {
            (mv.from, mv.to)
        } else {
            (mv.to, mv.from)
        };
        for i in lo..=hi {
            self.positions[self.sequence[i].index()] = i;
        }
    }
}
