//! Resumable simulated annealing for betweenness orderings.
//!
//! Given named variables and constraints `(A, B, C)` meaning "C must not lie
//! strictly between A and B", searches for a linear ordering that violates
//! as few constraints as possible.
//!
//! - **Instance model**: variables interned to dense ids, constraint lists
//!   with per-variable incidence.
//! - **Cost model**: counts violated constraints; single-variable moves are
//!   re-scored from the constraints that mention the moved variable.
//! - **Neighbor generation**: pop one variable and reinsert it elsewhere.
//! - **Annealing**: geometric cooling with Metropolis acceptance, writing
//!   every new best through a checkpoint store.
//! - **Solver**: resume from a checkpoint, bounded retries after an
//!   exhausted pass.
//! - **Checkpoints and files**: text checkpoints replaced atomically,
//!   instance parsing, solution output, archival of unsolved instances.
//!
//! # Example
//!
//! ```
//! use u_betweenness::{io, AnnealConfig, MemoryCheckpointStore, Solver};
//!
//! let instance = io::parse_instance("3\n1\nA B C\n").unwrap();
//! let mut store = MemoryCheckpointStore::new();
//! let mut solver = Solver::from_config(AnnealConfig::default().with_seed(42)).unwrap();
//!
//! let outcome = solver.solve(&instance, &mut store).unwrap();
//! assert!(outcome.solved);
//! assert_eq!(instance.cost_of_names(&instance.names_of(&outcome.ordering)).unwrap(), 0);
//! ```

pub mod anneal;
pub mod checkpoint;
pub mod cost;
pub mod error;
pub mod instance;
pub mod io;
pub mod neighbor;
pub mod ordering;
pub mod solver;

pub use anneal::{AnnealConfig, AnnealOutcome, AnnealResult, Annealer, Progress};
pub use checkpoint::{Checkpoint, CheckpointStore, FileCheckpointStore, MemoryCheckpointStore};
pub use error::{BetweennessError, Result};
pub use instance::{Constraint, Instance, VarId};
pub use ordering::Ordering;
pub use solver::{SolveOutcome, Solver};
