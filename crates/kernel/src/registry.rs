use blockspace_common::BlockTypeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// How the renderer should draw a block type.
///
/// The kernel never loads texture data; it only carries the reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Appearance {
    /// Image texture, with a flat colour to use if the texture cannot be loaded.
    Texture { path: String, fallback: [f32; 4] },
    /// Flat RGBA colour.
    SolidColor([f32; 4]),
    /// Named procedural pattern generated by the renderer.
    Pattern(String),
}

/// Immutable descriptor of a kind of block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockType {
    pub id: BlockTypeId,
    pub appearance: Appearance,
    /// Solid blocks take part in collision and stop rays.
    pub solid: bool,
}

impl BlockType {
    pub fn new(id: impl Into<BlockTypeId>, appearance: Appearance, solid: bool) -> Self {
        Self {
            id: id.into(),
            appearance,
            solid,
        }
    }
}

/// Errors from registry setup and id resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("block type {0:?} is already registered")]
    DuplicateId(BlockTypeId),
    #[error("unknown block type {0:?}")]
    UnknownBlockType(BlockTypeId),
}

/// Table of block types, filled at startup and read-only afterwards.
///
/// Types are handed out as `Arc`s so placed blocks can answer solidity
/// queries without going back to the registry.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    types: BTreeMap<BlockTypeId, Arc<BlockType>>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the stock catalogue: stone, grass, checkerboard and
    /// three flat-coloured blocks.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for block_type in default_block_types() {
            // Ids in the stock catalogue are distinct.
            let _ = registry.register(block_type);
        }
        registry
    }

    /// Add a block type. Fails if its id is taken.
    pub fn register(&mut self, block_type: BlockType) -> Result<Arc<BlockType>, RegistryError> {
        if self.types.contains_key(&block_type.id) {
            return Err(RegistryError::DuplicateId(block_type.id));
        }
        tracing::debug!(id = %block_type.id, solid = block_type.solid, "registered block type");
        let entry = Arc::new(block_type);
        self.types.insert(entry.id.clone(), Arc::clone(&entry));
        Ok(entry)
    }

    pub fn lookup(&self, id: &BlockTypeId) -> Result<Arc<BlockType>, RegistryError> {
        self.types
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownBlockType(id.clone()))
    }

    pub fn contains(&self, id: &BlockTypeId) -> bool {
        self.types.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered types in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<BlockType>> {
        self.types.values()
    }
}

fn default_block_types() -> Vec<BlockType> {
    vec![
        BlockType::new(
            "stone",
            Appearance::Texture {
                path: "assets/textures/stone.png".into(),
                fallback: [0.5, 0.5, 0.5, 1.0],
            },
            true,
        ),
        BlockType::new(
            "grass",
            Appearance::Texture {
                path: "assets/textures/grass_side.png".into(),
                fallback: [0.0, 0.5, 0.0, 1.0],
            },
            true,
        ),
        BlockType::new(
            "checkerboard",
            Appearance::Pattern("checkerboard".into()),
            true,
        ),
        BlockType::new("red_block", Appearance::SolidColor([1.0, 0.0, 0.0, 1.0]), true),
        BlockType::new("blue_block", Appearance::SolidColor([0.0, 0.0, 1.0, 1.0]), true),
        BlockType::new("green_block", Appearance::SolidColor([0.0, 1.0, 0.0, 1.0]), true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_lookup() {
        let mut r = BlockRegistry::new();
        r.register(BlockType::new(
            "glass",
            Appearance::SolidColor([1.0, 1.0, 1.0, 0.2]),
            true,
        ))
        .unwrap();
        let t = r.lookup(&"glass".into()).unwrap();
        assert!(t.solid);
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut r = BlockRegistry::with_defaults();
        let err = r
            .register(BlockType::new(
                "stone",
                Appearance::SolidColor([0.0; 4]),
                false,
            ))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateId("stone".into()));
        // The original entry is untouched.
        assert!(r.lookup(&"stone".into()).unwrap().solid);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let r = BlockRegistry::new();
        assert_eq!(
            r.lookup(&"lava".into()).unwrap_err(),
            RegistryError::UnknownBlockType("lava".into())
        );
    }

    #[test]
    fn defaults_cover_the_stock_catalogue() {
        let r = BlockRegistry::with_defaults();
        let ids: Vec<&str> = r.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "blue_block",
                "checkerboard",
                "grass",
                "green_block",
                "red_block",
                "stone"
            ]
        );
        assert!(r.iter().all(|t| t.solid));
    }

    #[test]
    fn appearance_round_trips_through_json() {
        let r = BlockRegistry::with_defaults();
        let grass = r.lookup(&"grass".into()).unwrap();
        let json = serde_json::to_string(grass.as_ref()).unwrap();
        let back: BlockType = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, grass.as_ref());
    }
}
