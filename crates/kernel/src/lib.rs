//! World kernel: block registry, sparse voxel grid, ray casting and player physics.
//!
//! # Invariants
//! - The grid is the single source of truth for occupancy; nothing caches it
//!   beyond one query.
//! - Single-cell grid mutations are validated before they are applied.
//! - Ray casts and physics steps are pure functions of their inputs.

pub mod grid;
pub mod physics;
pub mod player;
pub mod raycast;
pub mod registry;

pub use grid::{Block, GridBounds, GridError, GridEvent, GridSummary, WorldGrid};
pub use physics::{PhysicsConfig, PhysicsError, Solver, StepInput, StepReport};
pub use player::{MotionState, PlayerState};
pub use raycast::{MAX_TRAVERSAL_STEPS, RayHit, cast_ray};
pub use registry::{Appearance, BlockRegistry, BlockType, RegistryError};
