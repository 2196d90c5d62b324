//! Plugin host owning the bridge and SDK-interface registries.
//!
//! The host is created once by the application's initialization routine and
//! passed by reference to whatever needs to construct a backend. Discovery
//! runs in [`PluginHost::discover`]; nothing is resolved until a factory
//! selects a name.

use crate::bridge::{self, Bridge, BridgeConstructor, BridgeRegistry, LcmHandle, Simulator};
use crate::config::{BridgeConfig, RobotConfig};
use crate::error::{PluginError, PluginResult};
use crate::factory;
use crate::sdk::{self, InterfaceConstructor, InterfaceOptions, SdkInterface, SdkRegistry};
use holosoma_runtime::{
    CapabilityGroup, ManifestSource, Registry, RuntimeResult, SearchPaths, SymbolTable,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Constructors exported by the backends compiled into the host.
#[derive(Debug, Default)]
pub struct Symbols {
    /// Exports for the `holosoma.bridge` group.
    pub bridges: SymbolTable<BridgeConstructor>,

    /// Exports for the `holosoma.sdk` group.
    pub sdks: SymbolTable<InterfaceConstructor>,
}

impl Symbols {
    /// Create an empty set of exports.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Discovered entry point, as listed to operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPointInfo {
    pub group: String,
    pub name: String,
    pub package: String,
    pub reference: String,
    pub resolved: bool,
}

/// Owner of one registry per capability group.
#[derive(Debug)]
pub struct PluginHost {
    bridges: BridgeRegistry,
    sdks: SdkRegistry,
}

impl PluginHost {
    /// Discover both capability groups in `source`.
    ///
    /// The source is read once and both registries are built from that read.
    pub fn discover(source: &dyn ManifestSource, symbols: Symbols) -> RuntimeResult<Self> {
        let packages = source.packages()?;

        let bridges: BridgeRegistry = Registry::from_packages(
            &packages,
            CapabilityGroup::BRIDGE,
            Arc::new(symbols.bridges),
        )?;
        let sdks: SdkRegistry =
            Registry::from_packages(&packages, CapabilityGroup::SDK, Arc::new(symbols.sdks))?;

        info!(
            "Plugin host ready: {} bridges, {} SDK interfaces",
            bridges.len(),
            sdks.len()
        );
        Ok(Self { bridges, sdks })
    }

    /// Discover both capability groups from the default search paths.
    pub fn from_env(symbols: Symbols) -> RuntimeResult<Self> {
        Self::discover(&SearchPaths::from_env(), symbols)
    }

    /// Get the bridge registry.
    pub fn bridges(&self) -> &BridgeRegistry {
        &self.bridges
    }

    /// Get the SDK-interface registry.
    pub fn sdks(&self) -> &SdkRegistry {
        &self.sdks
    }

    /// Create the bridge selected by `robot_config.bridge.sdk_type`.
    pub fn create_bridge(
        &self,
        simulator: Arc<dyn Simulator>,
        robot_config: &RobotConfig,
        bridge_config: &BridgeConfig,
        lcm: Option<LcmHandle>,
    ) -> PluginResult<Box<dyn Bridge>> {
        bridge::create_sdk2py_bridge(&self.bridges, simulator, robot_config, bridge_config, lcm)
    }

    /// Create the SDK interface selected by `robot_config.sdk_type`.
    pub fn create_interface(
        &self,
        robot_config: &RobotConfig,
        options: &InterfaceOptions,
    ) -> PluginResult<Box<dyn SdkInterface>> {
        sdk::create_interface(&self.sdks, robot_config, options)
    }

    /// Check that `name` is registered under `group` without resolving it.
    ///
    /// Fails with the same configuration error a factory would raise.
    pub fn check(&self, group: &str, name: &str) -> PluginResult<()> {
        if group == self.bridges.group().as_str() {
            factory::select(&self.bridges, "sdk_type", name).map(|_| ())
        } else if group == self.sdks.group().as_str() {
            factory::select(&self.sdks, "sdk_type", name).map(|_| ())
        } else {
            Err(PluginError::Configuration {
                selector: "group",
                requested: group.to_string(),
                group: group.to_string(),
                available: vec![
                    self.bridges.group().to_string(),
                    self.sdks.group().to_string(),
                ],
            })
        }
    }

    /// List every registered entry point, bridges first.
    pub fn list(&self) -> Vec<EntryPointInfo> {
        let mut infos = describe(&self.bridges);
        infos.extend(describe(&self.sdks));
        infos
    }
}

fn describe<I: Clone>(registry: &Registry<I>) -> Vec<EntryPointInfo> {
    registry
        .entries()
        .map(|entry| EntryPointInfo {
            group: registry.group().to_string(),
            name: entry.name().to_string(),
            package: entry.package().to_string(),
            reference: entry.reference().to_string(),
            resolved: entry.is_resolved(),
        })
        .collect()
}
