//! Resume and retry around the annealing engine.
//!
//! 1. Load the checkpoint, if one exists and matches the instance
//! 2. Anneal from it (or from the instance's default ordering)
//! 3. While exhausted and retries remain, anneal again from the best
//!    ordering found, at the restart temperature

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::anneal::{AnnealConfig, Annealer};
use crate::checkpoint::CheckpointStore;
use crate::error::{BetweennessError, Result};
use crate::instance::Instance;
use crate::ordering::Ordering;

/// Final state of a solve.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Best ordering across all passes.
    pub ordering: Ordering,
    /// Unsatisfied constraints in `ordering`.
    pub cost: usize,
    pub solved: bool,
    /// Cost of the ordering the first pass started from.
    pub initial_cost: usize,
    /// Annealing passes run, including the first.
    pub passes: usize,
    /// Whether the first pass started from a checkpoint.
    pub resumed: bool,
}

/// Drives annealing passes for one instance.
pub struct Solver<'a, R: Rng> {
    annealer: Annealer<'a, R>,
}

impl<'a> Solver<'a, StdRng> {
    pub fn from_config(config: AnnealConfig) -> Result<Self> {
        Ok(Self::new(Annealer::from_config(config)?))
    }
}

impl<'a, R: Rng> Solver<'a, R> {
    pub fn new(annealer: Annealer<'a, R>) -> Self {
        Self { annealer }
    }

    pub fn annealer_mut(&mut self) -> &mut Annealer<'a, R> {
        &mut self.annealer
    }

    /// Searches for an ordering of `instance`, resuming from and writing
    /// through `store`.
    ///
    /// The checkpoint is left in place; clearing it once the result has been
    /// handed off is the caller's job.
    ///
    /// # Errors
    ///
    /// - [`BetweennessError::DegenerateInstance`] for fewer than two variables.
    /// - [`BetweennessError::PersistenceFailure`] if a checkpoint save fails.
    /// - Read errors from `store.load()` other than corruption.
    pub fn solve<S: CheckpointStore + ?Sized>(
        &mut self,
        instance: &Instance,
        store: &mut S,
    ) -> Result<SolveOutcome> {
        if instance.num_variables() < 2 {
            return Err(BetweennessError::DegenerateInstance {
                variables: instance.num_variables(),
            });
        }

        let (start, resumed) = match resume_point(instance, &*store)? {
            Some(ordering) => (ordering, true),
            None => (instance.default_ordering(), false),
        };

        let mut result = self.annealer.anneal(instance, start, store)?;
        let initial_cost = result.initial_cost;
        let mut passes = 1;

        let max_repeats = self.annealer.config().max_repeats;
        let restart = self.annealer.config().restart_temperature();
        while !result.is_solved() && passes <= max_repeats {
            info!(
                event = "retry",
                pass = passes + 1,
                best_cost = result.best_cost,
                temperature = restart,
            );
            let best_cost = result.best_cost;
            let best = result.best;
            result = self.annealer.anneal_from(instance, best, restart, store)?;
            debug_assert!(result.best_cost <= best_cost);
            passes += 1;
        }

        info!(
            event = "solve_end",
            solved = result.is_solved(),
            cost = result.best_cost,
            initial_cost = initial_cost,
            passes = passes,
            resumed = resumed,
        );

        Ok(SolveOutcome {
            solved: result.is_solved(),
            cost: result.best_cost,
            ordering: result.best,
            initial_cost,
            passes,
            resumed,
        })
    }
}

/// Ordering to resume from, if the store holds a usable checkpoint.
///
/// Corrupt checkpoints and checkpoints that do not fit the instance are
/// discarded with a warning. A stored cost that disagrees with the
/// recomputed one is reported; the recomputed cost is what the search uses.
fn resume_point<S: CheckpointStore + ?Sized>(
    instance: &Instance,
    store: &S,
) -> Result<Option<Ordering>> {
    let checkpoint = match store.load() {
        Ok(Some(checkpoint)) => checkpoint,
        Ok(None) => return Ok(None),
        Err(BetweennessError::CheckpointCorrupt(reason)) => {
            warn!(event = "checkpoint_discarded", reason = %reason);
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let ordering = match instance.ordering_from_names(&checkpoint.ordering) {
        Ok(ordering) => ordering,
        Err(e) => {
            warn!(event = "checkpoint_discarded", reason = %e);
            return Ok(None);
        }
    };

    let actual = crate::cost::cost(&ordering, instance.constraints())?;
    if actual != checkpoint.cost {
        warn!(
            event = "checkpoint_cost_mismatch",
            recorded = checkpoint.cost,
            actual = actual,
        );
    }
    debug!(event = "resume", unsatisfied = actual);
    Ok(Some(ordering))
}
