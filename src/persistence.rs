//! Snapshot persistence for atomic file-based storage.
//!
//! One JSON snapshot per save slot. Writes go to a temporary sibling file
//! and are renamed into place, so a failed write never corrupts the
//! previous valid snapshot. There is no cross-process locking: concurrent
//! external writers are last-writer-wins, which is acceptable for a
//! single-user tool.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{QuestlogError, Result};
use crate::state::ProgressState;

/// Default snapshot file name.
const SNAPSHOT_FILE: &str = "progress";

/// Snapshot file extension.
const SNAPSHOT_EXT: &str = "json";

/// Temporary file suffix for atomic writes.
const TMP_SUFFIX: &str = ".tmp";

/// Snapshot store providing atomic file operations for one save slot.
#[derive(Debug, Clone)]
pub struct StateStore {
    /// Directory where snapshots are stored.
    dir: PathBuf,
    /// Optional named slot; `None` is the default slot.
    slot: Option<String>,
}

impl StateStore {
    /// Creates a store for the default slot.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            slot: None,
        }
    }

    /// Creates a store for a named slot.
    #[must_use]
    pub fn with_slot(dir: impl AsRef<Path>, slot: impl Into<String>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            slot: Some(slot.into()),
        }
    }

    /// Returns the path to this slot's snapshot file.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        let file = match &self.slot {
            Some(slot) => format!("{SNAPSHOT_FILE}.{slot}.{SNAPSHOT_EXT}"),
            None => format!("{SNAPSHOT_FILE}.{SNAPSHOT_EXT}"),
        };
        self.dir.join(file)
    }

    /// Returns the path to the temporary file used during save.
    #[must_use]
    pub fn tmp_path(&self) -> PathBuf {
        let mut path = self.snapshot_path().into_os_string();
        path.push(TMP_SUFFIX);
        PathBuf::from(path)
    }

    /// Saves the state atomically, returning the snapshot location.
    pub fn save(&self, state: &ProgressState) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let tmp_path = self.tmp_path();
        let json = serde_json::to_string_pretty(state)?;

        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;

        let snapshot_path = self.snapshot_path();
        fs::rename(&tmp_path, &snapshot_path)?;
        debug!(path = %snapshot_path.display(), "snapshot saved");

        Ok(snapshot_path)
    }

    /// Loads the snapshot for this slot.
    ///
    /// Returns `Ok(None)` when no snapshot exists (first run). A corrupt or
    /// unsupported snapshot is a [`QuestlogError::Snapshot`] error instead,
    /// so the caller can tell a fresh start from data loss.
    pub fn load(&self) -> Result<Option<ProgressState>> {
        let snapshot_path = self.snapshot_path();

        let contents = match fs::read_to_string(&snapshot_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let state = parse_snapshot(&contents, &snapshot_path)?;
        Ok(Some(state))
    }

    /// Deletes this slot's snapshot if it exists.
    pub fn delete(&self) -> Result<()> {
        let snapshot_path = self.snapshot_path();
        if snapshot_path.exists() {
            fs::remove_file(&snapshot_path)?;
        }
        Ok(())
    }

    /// Checks if a snapshot exists for this slot.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.snapshot_path().exists()
    }

    /// Exports the state to a caller-chosen file, same format as [`save`].
    ///
    /// [`save`]: StateStore::save
    pub fn export(state: &ProgressState, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Imports a state from a previously exported file.
    ///
    /// Export followed by import reproduces an equivalent state.
    pub fn import(path: impl AsRef<Path>) -> Result<ProgressState> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        parse_snapshot(&contents, path)
    }
}

/// Parses snapshot JSON, rejecting unsupported versions, and re-normalizes
/// the derived fields so older snapshots still satisfy the invariants.
fn parse_snapshot(contents: &str, path: &Path) -> Result<ProgressState> {
    let mut state: ProgressState = serde_json::from_str(contents)
        .map_err(|e| QuestlogError::snapshot(path.to_path_buf(), e.to_string()))?;

    if !state.is_version_supported() {
        return Err(QuestlogError::snapshot(
            path.to_path_buf(),
            format!("unsupported snapshot version {}", state.version),
        ));
    }

    state.normalize();
    Ok(state)
}
