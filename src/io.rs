//! Instance files, solution files, and archival of unsolved instances.
//!
//! Instance format:
//!
//! ```text
//! <variable count>
//! <constraint count>
//! A B C
//! ...
//! ```
//!
//! One whitespace-separated triple per line, meaning "C is not between A
//! and B". A solution file is the ordering with each name followed by a
//! space.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::{info, warn};

use crate::checkpoint::{write_atomically, Checkpoint, CheckpointStore, FileCheckpointStore};
use crate::error::{BetweennessError, Result};
use crate::instance::Instance;
use crate::solver::{SolveOutcome, Solver};

/// Directory, beside the input and output, that receives unsolved instances.
pub const PROBLEMATIC_DIR: &str = "problematic";

/// Parses an instance from its text form.
///
/// # Errors
///
/// [`BetweennessError::InvalidInstance`] for unparsable counts, a line that
/// is not a triple, fewer constraint lines than declared, or more distinct
/// variables than declared.
pub fn parse_instance(text: &str) -> Result<Instance> {
    let mut lines = text.lines();
    let num_variables = parse_count(lines.next(), "variable count")?;
    let num_constraints = parse_count(lines.next(), "constraint count")?;

    let mut constraints = Vec::new();
    let mut lines = lines.filter(|line| !line.trim().is_empty());
    for i in 0..num_constraints {
        let line = lines.next().ok_or_else(|| {
            BetweennessError::InvalidInstance(format!(
                "expected {num_constraints} constraints, found {i}"
            ))
        })?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let triple: [&str; 3] = tokens.as_slice().try_into().map_err(|_| {
            BetweennessError::InvalidInstance(format!(
                "constraint {i} has {} tokens, expected 3: `{line}`",
                tokens.len()
            ))
        })?;
        constraints.push(triple);
    }

    let extra = lines.count();
    if extra > 0 {
        warn!(event = "trailing_lines_ignored", lines = extra);
    }

    Instance::from_constraints(num_variables, constraints)
}

fn parse_count(line: Option<&str>, what: &str) -> Result<usize> {
    let line = line.ok_or_else(|| BetweennessError::InvalidInstance(format!("missing {what}")))?;
    line.trim()
        .parse()
        .map_err(|_| BetweennessError::InvalidInstance(format!("bad {what} `{}`", line.trim())))
}

/// Reads and parses an instance file.
pub fn read_instance(path: impl AsRef<Path>) -> Result<Instance> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| BetweennessError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_instance(&text)
}

/// Renders an ordering as a solution line.
pub fn render_solution<S: AsRef<str>>(ordering: &[S]) -> String {
    let mut out = String::new();
    for name in ordering {
        out.push_str(name.as_ref());
        out.push(' ');
    }
    out
}

/// Where the final result of [`ProblemFiles::emit_result`] went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted {
    /// The full ordering was written to the output path.
    Solution(PathBuf),
    /// The input was moved aside and the best partial ordering written
    /// next to it.
    Archived { input: PathBuf, partial: PathBuf },
}

/// Input, output, and checkpoint paths for one instance.
#[derive(Debug, Clone)]
pub struct ProblemFiles {
    input: PathBuf,
    output: PathBuf,
}

impl ProblemFiles {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Checkpoint store at `<output>_partial`.
    pub fn checkpoint_store(&self) -> FileCheckpointStore {
        FileCheckpointStore::for_output(&self.output)
    }

    pub fn load_instance(&self) -> Result<Instance> {
        read_instance(&self.input)
    }

    /// Hands a final ordering back to the filesystem.
    ///
    /// Solved: the ordering is written to the output path. Unsolved: the
    /// input moves to `problematic/` beside it, and the ordering with its
    /// unsatisfied count is written to `problematic/<output>_partial`
    /// beside the output.
    ///
    /// # Errors
    ///
    /// [`BetweennessError::PersistenceFailure`] if any write or move fails.
    pub fn emit_result<S: AsRef<str>>(
        &self,
        ordering: &[S],
        cost: usize,
        solved: bool,
    ) -> Result<Emitted> {
        if solved {
            write_atomically(&self.output, &render_solution(ordering))?;
            info!(event = "solution_written", path = %self.output.display());
            return Ok(Emitted::Solution(self.output.clone()));
        }

        let archived_input = sibling_in_problematic(&self.input, "")?;
        let partial = sibling_in_problematic(&self.output, "_partial")?;

        if let Some(dir) = archived_input.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| BetweennessError::persistence(dir.display().to_string(), e))?;
        }
        fs::rename(&self.input, &archived_input).map_err(|e| {
            BetweennessError::persistence(archived_input.display().to_string(), e)
        })?;

        let checkpoint = Checkpoint::new(
            ordering.iter().map(|s| s.as_ref().to_string()).collect(),
            cost,
        );
        FileCheckpointStore::new(&partial).save(&checkpoint)?;

        info!(
            event = "instance_archived",
            input = %archived_input.display(),
            partial = %partial.display(),
            unsatisfied = cost,
        );
        Ok(Emitted::Archived {
            input: archived_input,
            partial,
        })
    }
}

/// `<dir>/problematic/<name><suffix>` for `path = <dir>/<name>`.
fn sibling_in_problematic(path: &Path, suffix: &str) -> Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        BetweennessError::persistence(
            path.display().to_string(),
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let mut name: OsString = name.to_owned();
    name.push(suffix);
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(dir.join(PROBLEMATIC_DIR).join(name))
}

/// Loads the instance, solves it with checkpoints at `<output>_partial`,
/// emits the result, and removes the checkpoint.
pub fn solve_files<R: Rng>(files: &ProblemFiles, solver: &mut Solver<'_, R>) -> Result<SolveOutcome> {
    let instance = files.load_instance()?;
    let mut store = files.checkpoint_store();
    let outcome = solver.solve(&instance, &mut store)?;

    let names = instance.names_of(&outcome.ordering);
    files.emit_result(&names, outcome.cost, outcome.solved)?;
    store.clear()?;
    Ok(outcome)
}
