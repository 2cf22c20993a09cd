//! Annealing execution loop.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use super::config::AnnealConfig;
use super::types::{AnnealOutcome, AnnealResult, Progress};
use crate::checkpoint::{Checkpoint, CheckpointStore};
use crate::cost;
use crate::error::{BetweennessError, Result};
use crate::instance::Instance;
use crate::neighbor::InsertMove;
use crate::ordering::Ordering;

/// Metropolis acceptance probability for moving from `old_cost` to
/// `new_cost` at `temperature`.
///
/// Improvements are always accepted. Otherwise the probability is
/// `exp((old - new) / T)`: equal costs give 1.0, and it shrinks as the gap
/// grows or the temperature falls.
pub fn acceptance_probability(old_cost: usize, new_cost: usize, temperature: f64) -> f64 {
    if new_cost < old_cost {
        1.0
    } else {
        ((old_cost as f64 - new_cost as f64) / temperature).exp()
    }
}

/// Simulated annealing over orderings of a betweenness instance.
///
/// Owns the random source and the configuration; each call to
/// [`Annealer::anneal`] is one pass from a start ordering down to the
/// temperature floor or to a zero-cost ordering, whichever comes first.
pub struct Annealer<'a, R: Rng> {
    config: AnnealConfig,
    rng: R,
    observer: Option<Box<dyn FnMut(&Progress) + 'a>>,
}

impl<'a> Annealer<'a, StdRng> {
    /// Builds an annealer whose random source is seeded from
    /// `config.seed`, or from the OS when no seed is set.
    pub fn from_config(config: AnnealConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(config, rng)
    }
}

impl<'a, R: Rng> Annealer<'a, R> {
    /// Builds an annealer with an injected random source.
    pub fn new(config: AnnealConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            observer: None,
        })
    }

    /// Registers a callback invoked once per temperature level.
    pub fn with_observer(mut self, observer: impl FnMut(&Progress) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn config(&self) -> &AnnealConfig {
        &self.config
    }

    /// Runs one pass from `start` at the configured initial temperature.
    pub fn anneal<S: CheckpointStore + ?Sized>(
        &mut self,
        instance: &Instance,
        start: Ordering,
        store: &mut S,
    ) -> Result<AnnealResult> {
        let temperature = self.config.initial_temperature;
        self.anneal_from(instance, start, temperature, store)
    }

    /// Runs one pass from `start` at `temperature`.
    ///
    /// Whenever an accepted move beats the best cost of the pass, the new
    /// best is saved to `store` before the search continues. An exhausted
    /// pass saves its best once more before returning, so a checkpoint
    /// exists even if the start was never improved upon.
    ///
    /// # Errors
    ///
    /// - [`BetweennessError::DegenerateInstance`] for fewer than two variables.
    /// - [`BetweennessError::InvalidInstance`] if `start` does not cover the
    ///   instance's variables.
    /// - [`BetweennessError::PersistenceFailure`] if a save fails; the pass
    ///   stops immediately.
    pub fn anneal_from<S: CheckpointStore + ?Sized>(
        &mut self,
        instance: &Instance,
        start: Ordering,
        temperature: f64,
        store: &mut S,
    ) -> Result<AnnealResult> {
        let n = start.len();
        if n < 2 {
            return Err(BetweennessError::DegenerateInstance { variables: n });
        }
        if n != instance.num_variables() {
            return Err(BetweennessError::InvalidInstance(format!(
                "start ordering has {n} variables, instance has {}",
                instance.num_variables()
            )));
        }

        let mut current = start;
        let mut current_cost = cost::cost(&current, instance.constraints())?;
        let initial_cost = current_cost;
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut temperature = temperature;
        let mut iterations = 0usize;
        let mut levels = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut checkpoint_writes = 0usize;

        info!(
            event = "anneal_start",
            variables = n,
            constraints = instance.num_constraints(),
            initial_cost = initial_cost,
            temperature = temperature,
        );

        while temperature > self.config.min_temperature && current_cost > 0 {
            for _ in 0..self.config.iterations_per_temperature {
                let mv = InsertMove::random(n, &mut self.rng)?;
                let moved = current.get(mv.from).ok_or_else(|| {
                    BetweennessError::InvalidInstance(format!("no variable at {}", mv.from))
                })?;

                let before = cost::violations_involving(instance, &current, moved);
                current.apply(mv);
                let after = cost::violations_involving(instance, &current, moved);
                let candidate_cost = current_cost + after - before;
                iterations += 1;

                let probability = acceptance_probability(current_cost, candidate_cost, temperature);
                if self.rng.random_range(0.0..1.0) < probability {
                    if candidate_cost < current_cost {
                        improving_moves += 1;
                    }
                    accepted_moves += 1;
                    current_cost = candidate_cost;

                    if current_cost < best_cost {
                        best.clone_from(&current);
                        best_cost = current_cost;
                        save_checkpoint(instance, &best, best_cost, store)?;
                        checkpoint_writes += 1;
                    }
                } else {
                    current.apply(mv.inverse());
                }

                if current_cost == 0 {
                    break;
                }
            }

            let progress = Progress {
                level: levels,
                temperature,
                cost: current_cost,
                best_cost,
            };
            trace!(
                event = "temperature_level",
                level = progress.level,
                temperature = progress.temperature,
                unsatisfied = progress.cost,
                best = progress.best_cost,
            );
            if let Some(observer) = self.observer.as_mut() {
                observer(&progress);
            }

            levels += 1;
            temperature *= self.config.alpha;
        }

        let outcome = if best_cost == 0 {
            AnnealOutcome::Solved
        } else {
            save_checkpoint(instance, &best, best_cost, store)?;
            checkpoint_writes += 1;
            AnnealOutcome::Exhausted
        };

        info!(
            event = "anneal_end",
            outcome = ?outcome,
            best_cost = best_cost,
            initial_cost = initial_cost,
            iterations = iterations,
            levels = levels,
            accepted = accepted_moves,
            improving = improving_moves,
        );

        Ok(AnnealResult {
            best,
            best_cost,
            initial_cost,
            outcome,
            iterations,
            temperature_levels: levels,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            checkpoint_writes,
        })
    }
}

fn save_checkpoint<S: CheckpointStore + ?Sized>(
    instance: &Instance,
    best: &Ordering,
    best_cost: usize,
    store: &mut S,
) -> Result<()> {
    store.save(&Checkpoint::new(instance.names_of(best), best_cost))?;
    debug!(event = "checkpoint_saved", unsatisfied = best_cost);
    Ok(())
}
