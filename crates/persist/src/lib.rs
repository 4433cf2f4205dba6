//! Persistence: versioned save documents and file-backed save slots.
//!
//! # Invariants
//! - Saving the same grid twice produces byte-identical text.
//! - Loading is validate-then-commit: a failed load never changes the grid.
//! - Saves newer than [`FORMAT_VERSION`] are refused, older ones are upgraded.

pub mod document;
pub mod store;

pub use document::{CodecError, FORMAT_VERSION, LoadError, SaveDocument, SavedBlock};
pub use store::{DEFAULT_SAVE_DIR, DEFAULT_SLOT, SaveStore, StoreError};
