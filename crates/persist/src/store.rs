//! File-backed save slots.
//!
//! Layout inside the store directory:
//! ```text
//! world_save.json        - default slot
//! <slot>.json            - any other named slot
//! <slot>.json.tmp        - in-flight write, renamed over the slot on success
//! ```

use crate::document::{CodecError, LoadError, SaveDocument};
use blockspace_kernel::{BlockRegistry, WorldGrid};
use std::path::{Path, PathBuf};

/// Directory used when none is configured.
pub const DEFAULT_SAVE_DIR: &str = "saves";

/// Slot written by the save action.
pub const DEFAULT_SLOT: &str = "world_save";

const SLOT_EXTENSION: &str = "json";

/// Errors from file-backed persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("no save in slot `{0}`")]
    NotFound(String),
    #[error("invalid slot name `{0}`")]
    InvalidSlot(String),
}

/// A directory of named save slots.
#[derive(Debug, Clone)]
pub struct SaveStore {
    root: PathBuf,
}

impl Default for SaveStore {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_DIR)
    }
}

impl SaveStore {
    /// Store rooted at `path`. The directory is created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            root: path.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `slot`.
    pub fn slot_path(&self, slot: &str) -> Result<PathBuf, StoreError> {
        validate_slot(slot)?;
        Ok(self.root.join(format!("{slot}.{SLOT_EXTENSION}")))
    }

    pub fn exists(&self, slot: &str) -> bool {
        self.slot_path(slot).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Encode the grid and write it to `slot`, replacing any previous save.
    ///
    /// The text goes to a sibling temporary file first and is renamed into
    /// place, so an interrupted write never leaves a truncated slot behind.
    pub fn write(&self, slot: &str, grid: &WorldGrid) -> Result<SaveDocument, StoreError> {
        let path = self.slot_path(slot)?;
        let doc = SaveDocument::capture(grid);
        let text = doc.serialize()?;

        std::fs::create_dir_all(&self.root)?;
        let tmp = path.with_extension(format!("{SLOT_EXTENSION}.tmp"));
        std::fs::write(&tmp, text.as_bytes())?;
        std::fs::rename(&tmp, &path)?;

        tracing::info!(slot, blocks = doc.len(), path = %path.display(), "world saved");
        Ok(doc)
    }

    /// Read and decode `slot` without touching any grid.
    pub fn read(&self, slot: &str) -> Result<SaveDocument, StoreError> {
        let path = self.slot_path(slot)?;
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(slot.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(SaveDocument::deserialize(&text)?)
    }

    /// Replace the grid's contents with `slot`. On any error the grid is
    /// unchanged.
    pub fn load(
        &self,
        slot: &str,
        grid: &mut WorldGrid,
        registry: &BlockRegistry,
    ) -> Result<usize, StoreError> {
        let doc = self.read(slot)?;
        let count = doc.load_into(grid, registry)?;
        tracing::info!(slot, blocks = count, "world loaded");
        Ok(count)
    }

    /// Names of all slots present, sorted.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut slots = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SLOT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                slots.push(stem.to_string());
            }
        }
        slots.sort();
        Ok(slots)
    }
}

fn validate_slot(slot: &str) -> Result<(), StoreError> {
    let ok = !slot.is_empty()
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidSlot(slot.to_string()))
    }
}
