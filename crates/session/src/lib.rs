//! Simulation session: owns the world grid, the player and the registry, and
//! advances them one tick at a time from input snapshots.
//!
//! # Invariants
//! - Per tick: look, selection, physics, break, place, then save/load.
//! - A physics error halts the tick before any grid mutation.
//! - Refused or missed interactions are outcomes, not errors.

pub mod config;
pub mod input;
pub mod session;

pub use config::{ConfigError, SessionConfig};
pub use input::{Hotbar, InputSnapshot};
pub use session::{
    EyePose, InteractionOutcome, PlacementRefusal, Session, SessionError, TickReport,
};
