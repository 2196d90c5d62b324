//! # holosoma-runtime
//!
//! Entry-point discovery and lazily resolved registries for Holosoma plugins.
//!
//! This crate provides:
//! - Plugin package discovery from well-known paths
//! - Package manifest parsing
//! - Capability groups partitioning the entry-point namespace
//! - Registries that resolve an entry point only when it is first requested
//!
//! ## Package Structure
//!
//! A plugin package is a directory containing a `manifest.toml` that advertises
//! named entry points per capability group:
//!
//! ```toml
//! [package]
//! name = "holosoma-ext-unitree"
//! version = "0.3.0"
//!
//! [entry_points."holosoma.bridge"]
//! unitree = "holosoma_ext_unitree.bridge:UnitreeSdk2Bridge"
//! ```
//!
//! ## Lazy Resolution
//!
//! Discovery only reads manifests. The code behind an entry point is resolved
//! through a [`Loader`] the first time its name is requested, and the result is
//! cached for the lifetime of the [`Registry`]. Selecting one backend therefore
//! never requires another backend's dependencies to be available.

pub mod discovery;
pub mod error;
pub mod group;
pub mod loader;
pub mod manifest;
pub mod reference;
pub mod registry;

pub use discovery::{
    discover_entry_points, discover_entry_points_from, discover_package, DiscoveredPackage,
    EntryPoint, ManifestSource, SearchPaths, StaticManifests,
};
pub use error::{RuntimeError, RuntimeResult};
pub use group::CapabilityGroup;
pub use loader::{Loader, SymbolTable};
pub use manifest::{PackageManifest, PackageMetadata};
pub use reference::EntryPointRef;
pub use registry::{Registry, RegistryEntry};
