//! Shared types for the blockspace workspace.
//!
//! # Invariants
//! - The world is Z-up; cell `(x, y, z)` covers `[x, x+1) × [y, y+1) × [z, z+1)`.

pub mod types;

pub use types::{Aabb, BlockPos, BlockTypeId, Face, SplitMix64};
