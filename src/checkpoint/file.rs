//! File-backed checkpoint store.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{Checkpoint, CheckpointStore};
use crate::error::{BetweennessError, Result};

/// Stores the checkpoint as a text file.
///
/// Saves go to a temporary file in the same directory which is then renamed
/// over the target, so the file on disk is always a complete snapshot.
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    path: PathBuf,
}

impl FileCheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<output>_partial`, next to a solution file.
    pub fn for_output(output: impl AsRef<Path>) -> Self {
        let mut name: OsString = output.as_ref().as_os_str().to_owned();
        name.push("_partial");
        Self::new(name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CheckpointStore for FileCheckpointStore {
    fn save(&mut self, checkpoint: &Checkpoint) -> Result<()> {
        write_atomically(&self.path, &checkpoint.to_string())
    }

    fn load(&self) -> Result<Option<Checkpoint>> {
        match fs::read(&self.path) {
            Ok(bytes) => {
                let text = String::from_utf8(bytes).map_err(|e| {
                    BetweennessError::CheckpointCorrupt(format!(
                        "{} is not UTF-8: {e}",
                        self.path.display()
                    ))
                })?;
                text.parse().map(Some)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(BetweennessError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn clear(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BetweennessError::persistence(
                self.path.display().to_string(),
                e,
            )),
        }
    }
}

/// Replaces `path` with `contents` via a synced temp file and a rename.
pub(crate) fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let target = path.display().to_string();
    let fail = |e: io::Error| BetweennessError::persistence(target.clone(), e);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(fail)?;

    let mut tmp_file = NamedTempFile::new_in(dir).map_err(fail)?;
    tmp_file.write_all(contents.as_bytes()).map_err(fail)?;
    tmp_file.as_file().sync_all().map_err(fail)?;
    tmp_file.persist(path).map_err(|err| fail(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample(cost: usize) -> Checkpoint {
        Checkpoint::new(vec!["c".into(), "a".into(), "b".into()], cost)
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = tempdir().unwrap();
        let store = FileCheckpointStore::new(dir.path().join("run.out_partial"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = FileCheckpointStore::new(dir.path().join("run.out_partial"));
        store.save(&sample(4)).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample(4)));

        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "Currently Unsatisfied: 4\nc a b ");
    }

    #[test]
    fn test_save_overwrites_whole_snapshot() {
        let dir = tempdir().unwrap();
        let mut store = FileCheckpointStore::new(dir.path().join("cp"));
        let long = Checkpoint::new((0..50).map(|i| format!("variable{i}")).collect(), 9);
        store.save(&long).unwrap();
        store.save(&sample(1)).unwrap();
        store.save(&sample(1)).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample(1)));
        // only the checkpoint remains; no temp files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let mut store = FileCheckpointStore::new(dir.path().join("nested/deeper/cp"));
        store.save(&sample(2)).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample(2)));
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let mut store = FileCheckpointStore::new(dir.path().join("cp"));
        store.save(&sample(2)).unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_load_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cp");
        fs::write(&path, "garbage").unwrap();
        let err = FileCheckpointStore::new(&path).load().unwrap_err();
        assert!(matches!(err, BetweennessError::CheckpointCorrupt(_)));
    }

    #[test]
    fn test_load_non_utf8_is_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cp");
        fs::write(&path, b"Currently Unsatisfied: 1\n\xff\xfe A B\n").unwrap();
        let err = FileCheckpointStore::new(&path).load().unwrap_err();
        assert!(matches!(err, BetweennessError::CheckpointCorrupt(_)));
    }

    #[test]
    fn test_for_output_appends_suffix() {
        let store = FileCheckpointStore::for_output("outputs/inst12.out");
        assert_eq!(store.path(), Path::new("outputs/inst12.out_partial"));
    }
}
