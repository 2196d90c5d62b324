//! Lazily resolved entry-point registry.
//!
//! A [`Registry`] maps the names advertised under one capability group to
//! their entry points. Each entry resolves its implementation through the
//! registry's [`Loader`] the first time it is requested and keeps the result
//! for the lifetime of the registry.

use crate::discovery::{
    discover_entry_points_from, DiscoveredPackage, EntryPoint, ManifestSource,
};
use crate::error::{RuntimeError, RuntimeResult};
use crate::group::CapabilityGroup;
use crate::loader::Loader;
use crate::reference::EntryPointRef;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// A single discovered entry point and its resolution cache.
pub struct RegistryEntry<I> {
    name: String,
    reference: EntryPointRef,
    package: String,
    resolved: Mutex<Option<I>>,
}

impl<I: Clone> RegistryEntry<I> {
    fn new(entry_point: EntryPoint) -> Self {
        Self {
            name: entry_point.name,
            reference: entry_point.reference,
            package: entry_point.package,
            resolved: Mutex::new(None),
        }
    }

    /// Get the entry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the reference the entry resolves.
    pub fn reference(&self) -> &EntryPointRef {
        &self.reference
    }

    /// Get the package that advertised the entry.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Check whether the implementation has been resolved.
    pub fn is_resolved(&self) -> bool {
        self.slot().is_some()
    }

    /// Resolve the implementation, loading it on first use.
    ///
    /// The entry's lock is held while loading, so concurrent first requests
    /// load once. A failed load leaves the entry unresolved and returns the
    /// loader's error unchanged.
    pub fn resolve(&self, loader: &dyn Loader<I>) -> anyhow::Result<I> {
        let mut slot = self.slot();

        if let Some(resolved) = slot.as_ref() {
            return Ok(resolved.clone());
        }

        debug!("Resolving entry point {} -> {}", self.name, self.reference);
        match loader.load(&self.reference) {
            Ok(resolved) => {
                info!("Loaded entry point {} from package {}", self.name, self.package);
                *slot = Some(resolved.clone());
                Ok(resolved)
            }
            Err(e) => {
                warn!("Failed to load entry point {} ({}): {}", self.name, self.reference, e);
                Err(e)
            }
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<I>> {
        // The slot is only ever written with a complete value
        self.resolved.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<I> fmt::Debug for RegistryEntry<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.name)
            .field("reference", &self.reference)
            .field("package", &self.package)
            .finish_non_exhaustive()
    }
}

/// Registry of the entry points advertised under one capability group.
pub struct Registry<I> {
    group: CapabilityGroup,
    entries: BTreeMap<String, RegistryEntry<I>>,
    loader: Arc<dyn Loader<I>>,
}

impl<I: Clone> Registry<I> {
    /// Discover every entry point of `group` in `source`.
    ///
    /// Only manifests are read; nothing is loaded until [`Registry::resolve`].
    pub fn discover(
        source: &dyn ManifestSource,
        group: CapabilityGroup,
        loader: Arc<dyn Loader<I>>,
    ) -> RuntimeResult<Self> {
        Self::from_packages(&source.packages()?, group, loader)
    }

    /// Build the registry for `group` from an already read set of packages.
    pub fn from_packages(
        packages: &[DiscoveredPackage],
        group: CapabilityGroup,
        loader: Arc<dyn Loader<I>>,
    ) -> RuntimeResult<Self> {
        let entry_points = discover_entry_points_from(packages, &group)?;
        let registry = Self::from_entry_points(group, entry_points, loader)?;

        info!(
            "Registered {} entry points for {}: [{}]",
            registry.len(),
            registry.group,
            registry.names().join(", ")
        );
        Ok(registry)
    }

    /// Build a registry from already discovered entry points.
    pub fn from_entry_points(
        group: CapabilityGroup,
        entry_points: impl IntoIterator<Item = EntryPoint>,
        loader: Arc<dyn Loader<I>>,
    ) -> RuntimeResult<Self> {
        let mut entries: BTreeMap<String, RegistryEntry<I>> = BTreeMap::new();

        for entry_point in entry_points {
            if entry_point.group != group {
                debug!(
                    "Ignoring entry point {} from group {}",
                    entry_point.name, entry_point.group
                );
                continue;
            }

            if let Some(existing) = entries.get(&entry_point.name) {
                return Err(RuntimeError::DuplicateEntryPoint {
                    group: group.to_string(),
                    name: entry_point.name,
                    first: existing.package.clone(),
                    second: entry_point.package,
                });
            }

            entries.insert(entry_point.name.clone(), RegistryEntry::new(entry_point));
        }

        Ok(Self {
            group,
            entries,
            loader,
        })
    }

    /// Get the capability group this registry serves.
    pub fn group(&self) -> &CapabilityGroup {
        &self.group
    }

    /// Get an entry by exact name.
    pub fn get(&self, name: &str) -> Option<&RegistryEntry<I>> {
        self.entries.get(name)
    }

    /// Check if a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Iterate over entries in name order.
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry<I>> {
        self.entries.values()
    }

    /// Get the number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether `name` is registered and already resolved.
    pub fn is_resolved(&self, name: &str) -> bool {
        self.entries.get(name).is_some_and(RegistryEntry::is_resolved)
    }

    /// Resolve an entry through this registry's loader.
    pub fn resolve(&self, entry: &RegistryEntry<I>) -> anyhow::Result<I> {
        entry.resolve(self.loader.as_ref())
    }
}

impl<I> fmt::Debug for Registry<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("group", &self.group)
            .field("entries", &self.entries.values().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::StaticManifests;
    use crate::manifest::PackageManifest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Loader handing out the attribute name and counting every load.
    #[derive(Default)]
    struct CountingLoader {
        loads: AtomicUsize,
    }

    impl Loader<String> for CountingLoader {
        fn load(&self, reference: &EntryPointRef) -> anyhow::Result<String> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if reference.attr() == "Broken" {
                anyhow::bail!("No module named 'rclpy'");
            }
            Ok(reference.attr().to_string())
        }
    }

    fn entry_point(name: &str, reference: &str) -> EntryPoint {
        EntryPoint {
            group: CapabilityGroup::BRIDGE,
            name: name.to_string(),
            reference: EntryPointRef::parse(reference).unwrap(),
            package: "test-package".to_string(),
        }
    }

    fn test_registry(loader: Arc<CountingLoader>) -> Registry<String> {
        Registry::from_entry_points(
            CapabilityGroup::BRIDGE,
            vec![
                entry_point("basic", "holosoma.bridge:Basic"),
                entry_point("ros2", "holosoma_ext.ros2:Broken"),
            ],
            loader,
        )
        .unwrap()
    }

    #[test]
    fn test_names_sorted() {
        let registry = test_registry(Arc::new(CountingLoader::default()));
        assert_eq!(registry.names(), vec!["basic", "ros2"]);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("basic"));
        assert!(!registry.contains("Basic"));
    }

    #[test]
    fn test_resolve_once() {
        let loader = Arc::new(CountingLoader::default());
        let registry = test_registry(Arc::clone(&loader));

        let entry = registry.get("basic").unwrap();
        assert!(!entry.is_resolved());

        for _ in 0..3 {
            assert_eq!(registry.resolve(entry).unwrap(), "Basic");
        }

        assert!(registry.is_resolved("basic"));
        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_resolution_is_not_cached() {
        let loader = Arc::new(CountingLoader::default());
        let registry = test_registry(Arc::clone(&loader));

        let entry = registry.get("ros2").unwrap();
        let err = registry.resolve(entry).unwrap_err();
        assert_eq!(err.to_string(), "No module named 'rclpy'");
        assert!(!registry.is_resolved("ros2"));

        // Other entries are unaffected
        assert!(registry.resolve(registry.get("basic").unwrap()).is_ok());
    }

    #[test]
    fn test_other_groups_ignored() {
        let mut sdk_entry = entry_point("unitree", "holosoma.sdk:Unitree");
        sdk_entry.group = CapabilityGroup::SDK;

        let registry: Registry<String> = Registry::from_entry_points(
            CapabilityGroup::BRIDGE,
            vec![entry_point("basic", "holosoma.bridge:Basic"), sdk_entry],
            Arc::new(CountingLoader::default()),
        )
        .unwrap();

        assert_eq!(registry.names(), vec!["basic"]);
    }

    #[test]
    fn test_duplicate_entry_rejected() {
        let result: RuntimeResult<Registry<String>> = Registry::from_entry_points(
            CapabilityGroup::BRIDGE,
            vec![
                entry_point("basic", "a:Basic"),
                entry_point("basic", "b:Basic"),
            ],
            Arc::new(CountingLoader::default()),
        );

        assert!(matches!(result, Err(RuntimeError::DuplicateEntryPoint { .. })));
    }

    #[test]
    fn test_discover_from_source() {
        let source = StaticManifests::new().with(
            PackageManifest::new("holosoma", "0.1.0").with_entry_point(
                "holosoma.bridge",
                "basic",
                EntryPointRef::parse("holosoma.bridge.base:BasicSdk2Bridge").unwrap(),
            ),
        );

        let loader = Arc::new(CountingLoader::default());
        let registry =
            Registry::discover(&source, CapabilityGroup::BRIDGE, Arc::clone(&loader) as _).unwrap();

        assert_eq!(registry.group(), &CapabilityGroup::BRIDGE);
        assert_eq!(registry.get("basic").unwrap().package(), "holosoma");
        assert_eq!(loader.loads.load(Ordering::SeqCst), 0);
    }

    /// Loader whose first load panics while the entry's lock is held.
    #[derive(Default)]
    struct PanicOnceLoader {
        loads: AtomicUsize,
    }

    impl Loader<u32> for PanicOnceLoader {
        fn load(&self, _reference: &EntryPointRef) -> anyhow::Result<u32> {
            if self.loads.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("backend initialisation aborted");
            }
            Ok(5)
        }
    }

    #[test]
    fn test_poisoned_entry_recovers() {
        let loader = Arc::new(PanicOnceLoader::default());
        let registry: Registry<u32> = Registry::from_entry_points(
            CapabilityGroup::BRIDGE,
            vec![entry_point("basic", "holosoma.bridge:Basic")],
            Arc::clone(&loader) as _,
        )
        .unwrap();
        let entry = registry.get("basic").unwrap();

        let first =
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| registry.resolve(entry)));
        assert!(first.is_err());
        assert!(!entry.is_resolved());

        assert_eq!(registry.resolve(entry).unwrap(), 5);
        assert!(entry.is_resolved());
        assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_from_packages() {
        let source = StaticManifests::new()
            .with(PackageManifest::new("holosoma", "0.1.0").with_entry_point(
                "holosoma.sdk",
                "unitree",
                EntryPointRef::parse("holosoma.sdk.unitree:UnitreeInterface").unwrap(),
            ))
            .with(PackageManifest::new("holosoma-ext", "0.1.0").with_entry_point(
                "holosoma.bridge",
                "basic",
                EntryPointRef::parse("holosoma_ext.bridge:Basic").unwrap(),
            ));
        let packages = source.packages().unwrap();

        let registry: Registry<String> = Registry::from_packages(
            &packages,
            CapabilityGroup::SDK,
            Arc::new(CountingLoader::default()),
        )
        .unwrap();

        assert_eq!(registry.names(), vec!["unitree"]);
        assert_eq!(registry.get("unitree").unwrap().package(), "holosoma");
    }
}
