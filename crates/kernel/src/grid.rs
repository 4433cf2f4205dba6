use crate::registry::BlockType;
use blockspace_common::{Aabb, BlockPos, BlockTypeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A block placed in the grid.
#[derive(Debug, Clone)]
pub struct Block {
    pub pos: BlockPos,
    pub block_type: Arc<BlockType>,
}

impl Block {
    pub fn type_id(&self) -> &BlockTypeId {
        &self.block_type.id
    }

    pub fn is_solid(&self) -> bool {
        self.block_type.solid
    }
}

/// A change record produced by every grid mutation.
///
/// Renderers drain these to rebuild only what changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GridEvent {
    /// A block was written. `replaced` carries the previous occupant, if any.
    Placed {
        pos: BlockPos,
        block_type: BlockTypeId,
        replaced: Option<BlockTypeId>,
    },
    /// A block was removed.
    Removed {
        pos: BlockPos,
        block_type: BlockTypeId,
    },
    /// The whole grid was emptied.
    Cleared { removed: usize },
}

/// Inclusive coordinate box that `set` refuses to write outside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min: BlockPos,
    pub max: BlockPos,
}

impl GridBounds {
    pub fn contains(&self, pos: BlockPos) -> bool {
        (self.min.x..=self.max.x).contains(&pos.x)
            && (self.min.y..=self.max.y).contains(&pos.y)
            && (self.min.z..=self.max.z).contains(&pos.z)
    }
}

/// Errors from grid mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("coordinate {0} is outside the world bounds")]
    InvalidCoordinate(BlockPos),
}

/// Sparse store of placed blocks keyed by cell coordinate.
///
/// The grid is the only source of truth for occupancy. Every mutation touches
/// a single coordinate and is validated before anything changes.
#[derive(Debug, Clone, Default)]
pub struct WorldGrid {
    blocks: HashMap<BlockPos, Block>,
    bounds: Option<GridBounds>,
    events: Vec<GridEvent>,
}

impl WorldGrid {
    /// Create an unbounded, empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty grid that rejects writes outside `bounds`.
    pub fn with_bounds(bounds: GridBounds) -> Self {
        Self {
            bounds: Some(bounds),
            ..Default::default()
        }
    }

    pub fn bounds(&self) -> Option<GridBounds> {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, pos: BlockPos) -> Option<&Block> {
        self.blocks.get(&pos)
    }

    pub fn is_occupied(&self, pos: BlockPos) -> bool {
        self.blocks.contains_key(&pos)
    }

    /// True iff the cell holds a block whose type is solid.
    pub fn is_solid(&self, pos: BlockPos) -> bool {
        self.blocks.get(&pos).is_some_and(Block::is_solid)
    }

    /// True if any solid cell strictly overlaps `aabb`.
    pub fn intersects_solid(&self, aabb: &Aabb) -> bool {
        aabb.cells().any(|pos| self.is_solid(pos))
    }

    /// Check a coordinate against the configured bounds without mutating.
    pub fn validate(&self, pos: BlockPos) -> Result<(), GridError> {
        match self.bounds {
            Some(bounds) if !bounds.contains(pos) => Err(GridError::InvalidCoordinate(pos)),
            _ => Ok(()),
        }
    }

    /// Insert or overwrite the block at `pos`. Returns the previous occupant.
    pub fn set(
        &mut self,
        pos: BlockPos,
        block_type: Arc<BlockType>,
    ) -> Result<Option<Block>, GridError> {
        self.validate(pos)?;
        let new_id = block_type.id.clone();
        let previous = self.blocks.insert(pos, Block { pos, block_type });
        tracing::trace!(%pos, block_type = %new_id, "block set");
        self.events.push(GridEvent::Placed {
            pos,
            block_type: new_id,
            replaced: previous.as_ref().map(|b| b.type_id().clone()),
        });
        Ok(previous)
    }

    /// Remove the block at `pos`. Removing an empty cell is a no-op.
    pub fn remove(&mut self, pos: BlockPos) -> Option<Block> {
        let removed = self.blocks.remove(&pos);
        if let Some(ref b) = removed {
            tracing::trace!(%pos, block_type = %b.type_id(), "block removed");
            self.events.push(GridEvent::Removed {
                pos,
                block_type: b.type_id().clone(),
            });
        }
        removed
    }

    /// Remove every block.
    pub fn clear(&mut self) {
        let removed = self.blocks.len();
        self.blocks.clear();
        self.events.push(GridEvent::Cleared { removed });
    }

    /// Occupied cells in unspecified order. Call again to restart.
    pub fn iter(&self) -> impl Iterator<Item = (BlockPos, &Block)> {
        self.blocks.iter().map(|(pos, block)| (*pos, block))
    }

    /// Drain and return the change log.
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only access to the change log.
    pub fn events(&self) -> &[GridEvent] {
        &self.events
    }

    /// Order-independent hash of the occupied cells and their type ids.
    ///
    /// Two grids with the same contents hash equal regardless of insertion
    /// order.
    pub fn state_hash(&self) -> u64 {
        let mut entries: Vec<(BlockPos, &str)> = self
            .blocks
            .iter()
            .map(|(pos, b)| (*pos, b.type_id().as_str()))
            .collect();
        entries.sort_unstable();

        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for (pos, id) in entries {
            mix(&mut h, &pos.x.to_le_bytes());
            mix(&mut h, &pos.y.to_le_bytes());
            mix(&mut h, &pos.z.to_le_bytes());
            mix(&mut h, id.as_bytes());
            mix(&mut h, &[0xff]);
        }
        h
    }

    /// Counts and extents for inspection tooling.
    pub fn summary(&self) -> GridSummary {
        let mut per_type: HashMap<&BlockTypeId, usize> = HashMap::new();
        let mut extent: Option<(BlockPos, BlockPos)> = None;
        for (pos, block) in self.iter() {
            *per_type.entry(block.type_id()).or_default() += 1;
            extent = Some(match extent {
                None => (pos, pos),
                Some((lo, hi)) => (
                    BlockPos::new(lo.x.min(pos.x), lo.y.min(pos.y), lo.z.min(pos.z)),
                    BlockPos::new(hi.x.max(pos.x), hi.y.max(pos.y), hi.z.max(pos.z)),
                ),
            });
        }
        let mut per_type: Vec<(BlockTypeId, usize)> = per_type
            .into_iter()
            .map(|(id, n)| (id.clone(), n))
            .collect();
        per_type.sort();
        GridSummary {
            block_count: self.len(),
            solid_count: self.blocks.values().filter(|b| b.is_solid()).count(),
            per_type,
            extent,
        }
    }
}

/// Summary of grid contents.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSummary {
    pub block_count: usize,
    pub solid_count: usize,
    /// Block count per type id, sorted by id.
    pub per_type: Vec<(BlockTypeId, usize)>,
    /// Inclusive min and max corners of the occupied cells.
    pub extent: Option<(BlockPos, BlockPos)>,
}

impl fmt::Display for GridSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid: blocks={} solid={}", self.block_count, self.solid_count)?;
        if let Some((lo, hi)) = self.extent {
            write!(f, " extent={lo}..={hi}")?;
        }
        for (id, n) in &self.per_type {
            write!(f, "\n  {id}: {n}")?;
        }
        Ok(())
    }
}
