//! Selection logic shared by the bridge and SDK-interface factories.

use crate::error::{PluginError, PluginResult};
use holosoma_runtime::{Registry, RegistryEntry};
use tracing::debug;

/// Validate `requested`, resolve its implementation and construct an instance.
///
/// An unknown name fails before the loader is touched. Resolution and
/// construction errors are returned as the backend produced them.
pub(crate) fn create<I, T>(
    registry: &Registry<I>,
    selector: &'static str,
    requested: &str,
    construct: impl FnOnce(I) -> anyhow::Result<T>,
) -> PluginResult<T>
where
    I: Clone,
{
    let entry = select(registry, selector, requested)?;
    let implementation = registry.resolve(entry).map_err(PluginError::Resolution)?;

    debug!("Constructing {} '{}' from {}", registry.group(), requested, entry.reference());
    construct(implementation).map_err(PluginError::Construction)
}

/// Look up `requested` without resolving it.
pub(crate) fn select<'r, I>(
    registry: &'r Registry<I>,
    selector: &'static str,
    requested: &str,
) -> PluginResult<&'r RegistryEntry<I>>
where
    I: Clone,
{
    registry
        .get(requested)
        .ok_or_else(|| PluginError::Configuration {
            selector,
            requested: requested.to_string(),
            group: registry.group().to_string(),
            available: registry.names().into_iter().map(String::from).collect(),
        })
}
