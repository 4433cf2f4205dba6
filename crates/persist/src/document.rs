//! Save document and its text codec.
//!
//! Format version 2 (current):
//! ```text
//! {
//!   "version": 2,
//!   "blocks": [
//!     { "x": 0, "y": 0, "z": 0, "blockTypeId": "grass" }
//!   ]
//! }
//! ```
//! Version 1 is the bare array written by early builds, one
//! `{ "x", "y", "z", "type" }` object per block. It is read and upgraded, never
//! written.

use blockspace_common::{BlockPos, BlockTypeId};
use blockspace_kernel::{BlockRegistry, GridError, RegistryError, WorldGrid};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Format version written by this codec.
pub const FORMAT_VERSION: u32 = 2;

/// Oldest format version the codec still reads.
pub const LEGACY_VERSION: u32 = 1;

/// Errors from decoding save text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("corrupt save: {0}")]
    Corrupt(String),
    #[error("unsupported save version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u64, supported: u32 },
    #[error("failed to encode save: {0}")]
    Encode(String),
}

/// Errors from applying a document to a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// One saved block.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedBlock {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub block_type_id: BlockTypeId,
}

impl SavedBlock {
    pub fn pos(&self) -> BlockPos {
        BlockPos::new(self.x, self.y, self.z)
    }
}

/// Versioned snapshot of a grid's occupied cells.
///
/// Built on save, consumed on load; not meant to be kept around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveDocument {
    pub version: u32,
    pub blocks: Vec<SavedBlock>,
}

/// Block record as written by version 1.
#[derive(Debug, Deserialize)]
struct LegacyBlock {
    x: i32,
    y: i32,
    z: i32,
    #[serde(rename = "type")]
    block_type: String,
}

impl SaveDocument {
    /// Snapshot every occupied cell, sorted by coordinate so the encoding of an
    /// unchanged grid never changes.
    pub fn capture(grid: &WorldGrid) -> Self {
        let mut blocks: Vec<SavedBlock> = grid
            .iter()
            .map(|(pos, block)| SavedBlock {
                x: pos.x,
                y: pos.y,
                z: pos.z,
                block_type_id: block.type_id().clone(),
            })
            .collect();
        blocks.sort();
        Self {
            version: FORMAT_VERSION,
            blocks,
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Encode as pretty JSON with a trailing newline.
    pub fn serialize(&self) -> Result<String, CodecError> {
        let mut text =
            serde_json::to_string_pretty(self).map_err(|e| CodecError::Encode(e.to_string()))?;
        text.push('\n');
        Ok(text)
    }

    /// Decode save text, upgrading older formats to the current version.
    ///
    /// Unknown fields are ignored. The version is checked before the rest of
    /// the structure so newer files report `UnsupportedVersion` rather than
    /// `Corrupt`.
    pub fn deserialize(text: &str) -> Result<Self, CodecError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| CodecError::Corrupt(e.to_string()))?;

        let doc = match value {
            serde_json::Value::Array(_) => {
                let legacy: Vec<LegacyBlock> = serde_json::from_value(value)
                    .map_err(|e| CodecError::Corrupt(format!("version 1 block list: {e}")))?;
                tracing::info!(blocks = legacy.len(), "upgrading version 1 save");
                SaveDocument {
                    version: FORMAT_VERSION,
                    blocks: legacy
                        .into_iter()
                        .map(|b| SavedBlock {
                            x: b.x,
                            y: b.y,
                            z: b.z,
                            block_type_id: BlockTypeId::new(b.block_type),
                        })
                        .collect(),
                }
            }
            serde_json::Value::Object(ref fields) => {
                let version = fields
                    .get("version")
                    .ok_or_else(|| CodecError::Corrupt("missing field `version`".into()))?
                    .as_u64()
                    .ok_or_else(|| {
                        CodecError::Corrupt("`version` is not a non-negative integer".into())
                    })?;
                if version > FORMAT_VERSION as u64 {
                    return Err(CodecError::UnsupportedVersion {
                        found: version,
                        supported: FORMAT_VERSION,
                    });
                }
                if version < LEGACY_VERSION as u64 {
                    return Err(CodecError::Corrupt(format!("invalid version {version}")));
                }
                let mut doc: SaveDocument = serde_json::from_value(value)
                    .map_err(|e| CodecError::Corrupt(e.to_string()))?;
                doc.version = FORMAT_VERSION;
                doc
            }
            _ => {
                return Err(CodecError::Corrupt(
                    "expected an object or a block list".into(),
                ));
            }
        };

        let mut seen = HashSet::with_capacity(doc.blocks.len());
        for block in &doc.blocks {
            if !seen.insert(block.pos()) {
                return Err(CodecError::Corrupt(format!(
                    "coordinate {} appears more than once",
                    block.pos()
                )));
            }
        }
        Ok(doc)
    }

    /// Replace the contents of `grid` with this document.
    ///
    /// Every entry is resolved against the registry and checked against the
    /// grid's bounds before the grid is touched, so on error the grid is left
    /// exactly as it was. Returns the number of blocks written.
    pub fn load_into(
        &self,
        grid: &mut WorldGrid,
        registry: &BlockRegistry,
    ) -> Result<usize, LoadError> {
        let mut resolved = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            let block_type = registry.lookup(&block.block_type_id)?;
            grid.validate(block.pos())?;
            resolved.push((block.pos(), block_type));
        }

        grid.clear();
        for (pos, block_type) in resolved {
            grid.set(pos, block_type)?;
        }
        Ok(self.blocks.len())
    }
}
