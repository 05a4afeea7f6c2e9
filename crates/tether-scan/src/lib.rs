//! Reference integrity scanning for host-owned scene graphs.
//!
//! The host exposes its object tree through [`SceneView`] and each
//! component describes its own fields through [`Inspect`]. The [`Scanner`]
//! walks the tree depth-first and produces a [`Report`] listing every
//! reference slot that holds nothing (never assigned, or pointing at a
//! destroyed object) and every component whose script failed to load.
//!
//! # Key Types
//!
//! - [`Scanner`] -- `scan`, `scan_active_tree`, `scan_external_asset`
//! - [`Report`] / [`Finding`] -- the scan result consumed by tooling
//! - [`FieldDescriptor`] -- one declared field and its current slots
//! - [`SceneGraph`] -- in-memory [`SceneView`] loadable from JSON
//! - [`AssetLoader`] -- opens assets outside the active scene

pub mod asset;
pub mod error;
pub mod field;
pub mod graph;
pub mod report;
pub mod scanner;
pub mod view;

pub use asset::{AssetLoader, DirectoryAssetLoader, NoAssets};
pub use error::{ScanError, ScanResult};
pub use field::{
    CollectionKind, ElementType, FieldDescriptor, FieldShape, Slot, Visibility, UNKNOWN_TYPE,
};
pub use graph::{
    ComponentEntry, ComponentRecord, NodeId, ObjectDescription, SceneDescription, SceneGraph,
};
pub use report::{Finding, Report, ScanWarning, Severity};
pub use scanner::{HostCapability, Scanner, MISSING_SCRIPT};
pub use view::{ComponentSlot, Inspect, SceneView};
