//! Package manifest parsing.
//!
//! Each plugin package has a `manifest.toml` that describes the package and
//! the entry points it advertises, grouped by capability group.

use crate::error::{RuntimeError, RuntimeResult};
use crate::reference::EntryPointRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Package manifest structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    /// Package metadata.
    pub package: PackageMetadata,

    /// Advertised entry points: group -> (name -> reference).
    #[serde(default)]
    pub entry_points: BTreeMap<String, BTreeMap<String, EntryPointRef>>,
}

/// Package metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Distribution name of the package.
    pub name: String,

    /// Version string (semver).
    pub version: String,

    /// Package description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PackageManifest {
    /// Create a manifest with no entry points.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            package: PackageMetadata {
                name: name.into(),
                version: version.into(),
                description: None,
            },
            entry_points: BTreeMap::new(),
        }
    }

    /// Add an entry point, builder style.
    pub fn with_entry_point(
        mut self,
        group: impl Into<String>,
        name: impl Into<String>,
        reference: EntryPointRef,
    ) -> Self {
        self.entry_points
            .entry(group.into())
            .or_default()
            .insert(name.into(), reference);
        self
    }

    /// Load a manifest from a TOML file.
    pub fn from_file(path: &Path) -> RuntimeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content).map_err(|e| match e {
            RuntimeError::InvalidManifest(reason) => {
                RuntimeError::InvalidManifest(format!("{}: {}", path.display(), reason))
            }
            other => RuntimeError::InvalidManifest(format!("{}: {}", path.display(), other)),
        })
    }

    /// Parse a manifest from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> RuntimeResult<Self> {
        let manifest: PackageManifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate the manifest.
    pub fn validate(&self) -> RuntimeResult<()> {
        if self.package.name.trim().is_empty() {
            return Err(RuntimeError::InvalidManifest(
                "Package name cannot be empty".to_string(),
            ));
        }

        if self.package.version.trim().is_empty() {
            return Err(RuntimeError::InvalidManifest(
                "Package version cannot be empty".to_string(),
            ));
        }

        for (group, entries) in &self.entry_points {
            if group.trim().is_empty() {
                return Err(RuntimeError::InvalidManifest(format!(
                    "Package '{}' declares an entry point group with an empty name",
                    self.package.name
                )));
            }

            if entries.keys().any(|name| name.trim().is_empty()) {
                return Err(RuntimeError::InvalidManifest(format!(
                    "Package '{}' declares an unnamed entry point in group '{}'",
                    self.package.name, group
                )));
            }
        }

        Ok(())
    }

    /// Entry points advertised under a group, sorted by name.
    pub fn entries(&self, group: &str) -> impl Iterator<Item = (&str, &EntryPointRef)> {
        self.entry_points
            .get(group)
            .into_iter()
            .flat_map(|entries| entries.iter().map(|(name, r)| (name.as_str(), r)))
    }

    /// Groups this package advertises entry points for.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.entry_points.keys().map(String::as_str)
    }
}
