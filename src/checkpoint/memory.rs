//! In-process checkpoint store.

use super::{Checkpoint, CheckpointStore};
use crate::error::Result;

/// Keeps the checkpoint in memory, in its text form.
///
/// Useful when a search does not need to survive the process, and for
/// exercising resume logic without touching the filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryCheckpointStore {
    text: Option<String>,
    saves: usize,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `checkpoint`.
    pub fn with_checkpoint(checkpoint: &Checkpoint) -> Self {
        Self::from_text(checkpoint.to_string())
    }

    /// A store holding raw text, which need not be a valid checkpoint.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            saves: 0,
        }
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none()
    }
}

impl CheckpointStore for MemoryCheckpointStore {
    fn save(&mut self, checkpoint: &Checkpoint) -> Result<()> {
        self.text = Some(checkpoint.to_string());
        self.saves += 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<Checkpoint>> {
        self.text
            .as_deref()
            .map(|text| text.parse::<Checkpoint>())
            .transpose()
    }

    fn clear(&mut self) -> Result<()> {
        self.text = None;
        Ok(())
    }
}
