//! Plugin package discovery.
//!
//! Packages are discovered from the following locations (in order):
//!
//! 1. Entries of `$HOLOSOMA_PLUGIN_PATH`
//! 2. `$XDG_DATA_HOME/holosoma/plugins/` (user packages)
//! 3. `$XDG_DATA_DIRS/holosoma/plugins/` (system packages)
//! 4. `/usr/local/share/holosoma/plugins` and `/usr/share/holosoma/plugins`
//!
//! Each package is a directory containing a `manifest.toml` file. Discovery
//! only reads manifests; no entry point is resolved here.

use crate::error::{RuntimeError, RuntimeResult};
use crate::group::CapabilityGroup;
use crate::manifest::PackageManifest;
use crate::reference::EntryPointRef;
use std::collections::{BTreeMap, HashSet};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable listing extra package directories.
pub const PLUGIN_PATH_ENV: &str = "HOLOSOMA_PLUGIN_PATH";

/// File name of a package manifest inside a package directory.
pub const MANIFEST_FILE: &str = "manifest.toml";

/// A package found by a [`ManifestSource`].
#[derive(Debug, Clone)]
pub struct DiscoveredPackage {
    /// Parsed manifest.
    pub manifest: PackageManifest,

    /// Directory the package was found in, if it came from disk.
    pub path: Option<PathBuf>,
}

impl DiscoveredPackage {
    /// Get the package name.
    pub fn name(&self) -> &str {
        &self.manifest.package.name
    }

    /// Get the package version.
    pub fn version(&self) -> &str {
        &self.manifest.package.version
    }
}

/// A named entry point advertised by a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    /// Group the entry point belongs to.
    pub group: CapabilityGroup,

    /// Name the entry point is selected by.
    pub name: String,

    /// Where the implementation lives.
    pub reference: EntryPointRef,

    /// Package that advertised it.
    pub package: String,
}

/// Anything that can enumerate package manifests.
pub trait ManifestSource {
    /// Enumerate every package this source knows about.
    ///
    /// Errors are fatal: without manifests no capability can be selected.
    fn packages(&self) -> RuntimeResult<Vec<DiscoveredPackage>>;
}

/// Manifests held in memory, e.g. for packages compiled into the binary.
#[derive(Debug, Clone, Default)]
pub struct StaticManifests {
    manifests: Vec<PackageManifest>,
}

impl StaticManifests {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a manifest, builder style.
    pub fn with(mut self, manifest: PackageManifest) -> Self {
        self.manifests.push(manifest);
        self
    }

    /// Add a manifest.
    pub fn push(&mut self, manifest: PackageManifest) {
        self.manifests.push(manifest);
    }
}

impl FromIterator<PackageManifest> for StaticManifests {
    fn from_iter<T: IntoIterator<Item = PackageManifest>>(iter: T) -> Self {
        Self {
            manifests: iter.into_iter().collect(),
        }
    }
}

impl ManifestSource for StaticManifests {
    fn packages(&self) -> RuntimeResult<Vec<DiscoveredPackage>> {
        self.manifests
            .iter()
            .map(|manifest| {
                manifest.validate()?;
                Ok(DiscoveredPackage {
                    manifest: manifest.clone(),
                    path: None,
                })
            })
            .collect()
    }
}

/// Ordered list of directories scanned for packages.
///
/// Earlier directories take priority: when a package name appears in more
/// than one directory, only the first copy is used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    dirs: Vec<PathBuf>,
}

impl SearchPaths {
    /// Create search paths from an explicit list of directories.
    pub fn new(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut paths = Self::default();
        for dir in dirs {
            paths.push(dir);
        }
        paths
    }

    /// Default search paths: `$HOLOSOMA_PLUGIN_PATH`, then user, then system.
    pub fn from_env() -> Self {
        let mut paths = Self::default();

        if let Some(value) = std::env::var_os(PLUGIN_PATH_ENV) {
            for dir in std::env::split_paths(&value) {
                if !dir.as_os_str().is_empty() {
                    paths.push(dir);
                }
            }
        }

        if let Some(user_dir) = user_plugins_dir() {
            paths.push(user_dir);
        }

        for dir in system_plugins_dirs() {
            paths.push(dir);
        }

        paths
    }

    /// Append a directory unless it is already listed.
    pub fn push(&mut self, dir: PathBuf) {
        if !self.dirs.contains(&dir) {
            self.dirs.push(dir);
        }
    }

    /// Directories in priority order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl ManifestSource for SearchPaths {
    fn packages(&self) -> RuntimeResult<Vec<DiscoveredPackage>> {
        let mut packages = Vec::new();
        let mut seen = HashSet::new();

        for dir in &self.dirs {
            debug!("Scanning plugin directory: {:?}", dir);
            discover_in_directory(dir, &mut packages, &mut seen)?;
        }

        info!("Discovered {} plugin packages", packages.len());
        Ok(packages)
    }
}

/// Get the user plugins directory.
pub fn user_plugins_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "holosoma").map(|dirs| dirs.data_dir().join("plugins"))
}

/// Get the system plugins directories.
pub fn system_plugins_dirs() -> Vec<PathBuf> {
    system_plugins_dirs_from(std::env::var_os("XDG_DATA_DIRS").as_deref())
}

fn system_plugins_dirs_from(data_dirs: Option<&OsStr>) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(data_dirs) = data_dirs {
        for dir in std::env::split_paths(data_dirs) {
            if !dir.as_os_str().is_empty() {
                dirs.push(dir.join("holosoma/plugins"));
            }
        }
    }

    for dir in ["/usr/local/share/holosoma/plugins", "/usr/share/holosoma/plugins"] {
        let path = PathBuf::from(dir);
        if !dirs.contains(&path) {
            dirs.push(path);
        }
    }

    dirs
}

/// Discover packages in a specific directory.
///
/// A missing directory contributes nothing. An unreadable directory or a
/// malformed manifest is an error.
pub fn discover_in_directory(
    dir: &Path,
    packages: &mut Vec<DiscoveredPackage>,
    seen: &mut HashSet<String>,
) -> RuntimeResult<()> {
    if !dir.exists() {
        return Ok(());
    }

    let mut package_dirs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            package_dirs.push(path);
        }
    }
    // read_dir order is platform dependent
    package_dirs.sort();

    for path in package_dirs {
        if !path.join(MANIFEST_FILE).exists() {
            debug!("Skipping {:?}: no {}", path, MANIFEST_FILE);
            continue;
        }

        let package = discover_package(&path)?;

        // Earlier search directories shadow later ones
        if !seen.insert(package.name().to_string()) {
            debug!("Skipping shadowed package: {} at {:?}", package.name(), path);
            continue;
        }

        debug!(
            "Discovered package: {} v{} at {:?}",
            package.name(),
            package.version(),
            path
        );
        packages.push(package);
    }

    Ok(())
}

/// Discover a single package from its directory.
pub fn discover_package(path: &Path) -> RuntimeResult<DiscoveredPackage> {
    let manifest = PackageManifest::from_file(&path.join(MANIFEST_FILE))?;

    Ok(DiscoveredPackage {
        manifest,
        path: Some(path.to_path_buf()),
    })
}

/// Enumerate the entry points a source advertises under one group.
///
/// Only metadata is read. A name advertised by two different packages is
/// rejected rather than silently resolved in favour of either.
pub fn discover_entry_points(
    source: &dyn ManifestSource,
    group: &CapabilityGroup,
) -> RuntimeResult<Vec<EntryPoint>> {
    discover_entry_points_from(&source.packages()?, group)
}

/// Enumerate the entry points of one group in an already read set of packages.
///
/// Lets several groups share a single read of the manifest source.
pub fn discover_entry_points_from(
    packages: &[DiscoveredPackage],
    group: &CapabilityGroup,
) -> RuntimeResult<Vec<EntryPoint>> {
    let mut found: BTreeMap<String, EntryPoint> = BTreeMap::new();

    for package in packages {
        for (name, reference) in package.manifest.entries(group.as_str()) {
            if let Some(existing) = found.get(name) {
                return Err(RuntimeError::DuplicateEntryPoint {
                    group: group.to_string(),
                    name: name.to_string(),
                    first: existing.package.clone(),
                    second: package.name().to_string(),
                });
            }

            found.insert(
                name.to_string(),
                EntryPoint {
                    group: group.clone(),
                    name: name.to_string(),
                    reference: reference.clone(),
                    package: package.name().to_string(),
                },
            );
        }
    }

    debug!("Found {} entry points in group {}", found.len(), group);
    Ok(found.into_values().collect())
}
