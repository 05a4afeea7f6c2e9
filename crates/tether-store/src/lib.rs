//! Durable key-value file store for host-runtime hooks.
//!
//! Records are addressed by a `(category, filename)` pair and live at
//! `<hooks>/<category>/<filename>`. Every category is one subdirectory; the
//! fixed set (`scenes`, `tasks`, `convoys`, `messages`, `validation`,
//! `assets`, `snapshots`) is created when the store opens, and custom
//! categories are created on first write.
//!
//! # Write Protocol
//!
//! 1. Serialize the value (JSON via `serde_json`).
//! 2. Write it to a uniquely named temp file beside the final path.
//! 3. Under a process-wide lock, replace the final path with the temp file.
//! 4. On any failure, remove the temp file and propagate the error.
//!
//! Readers never see a partially written record. Concurrent writers to the
//! same record race and the last rename wins.
//!
//! # Modules
//!
//! - [`category`] -- [`Category`] and key segment validation
//! - [`config`] -- [`StoreConfig`] and hooks path resolution
//! - [`store`] -- the [`HookStore`] itself
//! - [`error`] -- [`StoreError`]

pub mod category;
pub mod config;
pub mod error;
mod lock;
pub mod store;

#[cfg(test)]
mod proptests;

pub use category::{validate_segment, Category};
pub use config::{resolve_hooks_path, LockScope, ReplaceStrategy, StoreConfig, SyncMode};
pub use error::{StoreError, StoreResult};
pub use store::HookStore;
