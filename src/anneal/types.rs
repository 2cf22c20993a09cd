//! Annealing progress and results.

use crate::ordering::Ordering;

/// How an annealing pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnealOutcome {
    /// Every constraint is satisfied.
    Solved,
    /// The temperature floor was reached with violations left. The caller
    /// decides whether to retry or archive.
    Exhausted,
}

/// Snapshot emitted once per temperature level.
///
/// Purely informational; observers cannot influence the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Zero-based temperature level just completed.
    pub level: usize,
    /// Temperature the level ran at.
    pub temperature: f64,
    /// Currently unsatisfied constraints.
    pub cost: usize,
    /// Fewest unsatisfied constraints seen so far in the pass.
    pub best_cost: usize,
}

/// Result of a single annealing pass.
#[derive(Debug, Clone)]
pub struct AnnealResult {
    /// The best ordering found.
    pub best: Ordering,

    /// Cost of the best ordering.
    pub best_cost: usize,

    /// Cost of the starting ordering.
    pub initial_cost: usize,

    pub outcome: AnnealOutcome,

    /// Total number of neighbor evaluations.
    pub iterations: usize,

    /// Number of completed temperature levels.
    pub temperature_levels: usize,

    /// Temperature when the pass stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of accepted moves that lowered the current cost.
    pub improving_moves: usize,

    /// Number of checkpoint saves issued by the pass.
    pub checkpoint_writes: usize,
}

impl AnnealResult {
    pub fn is_solved(&self) -> bool {
        self.outcome == AnnealOutcome::Solved
    }
}
