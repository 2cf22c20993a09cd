//! Resumable checkpoints.
//!
//! A checkpoint is the best ordering found so far together with its cost.
//! Stores replace the whole snapshot on every save, so a reader sees either
//! the previous checkpoint or the new one, never a mix.
//!
//! The text form is a header line followed by the ordering:
//!
//! ```text
//! Currently Unsatisfied: 3
//! b d a c
//! ```

mod file;
mod memory;

pub use file::FileCheckpointStore;
pub use memory::MemoryCheckpointStore;

pub(crate) use file::write_atomically;

use std::fmt;
use std::str::FromStr;

use crate::error::{BetweennessError, Result};

const HEADER_PREFIX: &str = "Currently Unsatisfied:";

/// Best-known ordering (by name) and its unsatisfied-constraint count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub ordering: Vec<String>,
    pub cost: usize,
}

impl Checkpoint {
    pub fn new(ordering: Vec<String>, cost: usize) -> Self {
        Self { ordering, cost }
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{HEADER_PREFIX} {}", self.cost)?;
        for name in &self.ordering {
            write!(f, "{name} ")?;
        }
        Ok(())
    }
}

impl FromStr for Checkpoint {
    type Err = BetweennessError;

    fn from_str(s: &str) -> Result<Self> {
        let mut lines = s.lines();
        let header = lines
            .next()
            .ok_or_else(|| BetweennessError::CheckpointCorrupt("empty checkpoint".into()))?;
        let count = header
            .trim()
            .strip_prefix(HEADER_PREFIX)
            .ok_or_else(|| {
                BetweennessError::CheckpointCorrupt(format!("unexpected header `{header}`"))
            })?
            .trim();
        let cost = count.parse::<usize>().map_err(|_| {
            BetweennessError::CheckpointCorrupt(format!("bad unsatisfied count `{count}`"))
        })?;

        let ordering: Vec<String> = lines
            .next()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if ordering.is_empty() {
            return Err(BetweennessError::CheckpointCorrupt(
                "missing ordering line".into(),
            ));
        }

        Ok(Self { ordering, cost })
    }
}

/// Durable home of a single run's checkpoint.
///
/// `save` must finish (or fail) before the caller continues searching; the
/// last successful save is the recovery point after an interruption.
pub trait CheckpointStore {
    /// Replaces the stored checkpoint. Repeating an identical save is
    /// harmless.
    fn save(&mut self, checkpoint: &Checkpoint) -> Result<()>;

    /// Returns the stored checkpoint, if any.
    ///
    /// # Errors
    ///
    /// [`BetweennessError::CheckpointCorrupt`] if stored content is
    /// ill-formed.
    fn load(&self) -> Result<Option<Checkpoint>>;

    /// Removes the stored checkpoint. A no-op when there is none.
    fn clear(&mut self) -> Result<()>;
}

impl<S: CheckpointStore + ?Sized> CheckpointStore for &mut S {
    fn save(&mut self, checkpoint: &Checkpoint) -> Result<()> {
        (**self).save(checkpoint)
    }

    fn load(&self) -> Result<Option<Checkpoint>> {
        (**self).load()
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }
}
