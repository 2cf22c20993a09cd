//! Simulated annealing over variable orderings.
//!
//! Each pass starts from a given ordering, cools geometrically, and accepts
//! worsening moves with the Metropolis probability. Strict improvements of
//! the pass's best are written through a [`crate::CheckpointStore`] before
//! the search continues.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

mod config;
mod runner;
mod types;

pub use config::AnnealConfig;
pub use runner::{acceptance_probability, Annealer};
pub use types::{AnnealOutcome, AnnealResult, Progress};
