//! Simulator bridges.
//!
//! A bridge mediates between a simulator and a robot's control interface.
//! Which bridge is used is decided by `robot_config.bridge.sdk_type` and
//! looked up in the `holosoma.bridge` capability group.

use crate::config::{BridgeConfig, RobotConfig};
use crate::error::PluginResult;
use crate::factory;
use holosoma_runtime::Registry;
use std::any::Any;
use std::sync::Arc;

/// A running simulator a bridge can attach to.
pub trait Simulator: Send + Sync {
    /// Simulator name, e.g. `isaacgym` or `mujoco`.
    fn name(&self) -> &str;

    /// Downcast support for bridges that need the concrete simulator.
    fn as_any(&self) -> &dyn Any;
}

/// A constructed bridge instance.
pub trait Bridge: Send {
    /// The `sdk_type` this bridge implements.
    fn sdk_type(&self) -> &str;

    /// Downcast support for callers that need the concrete bridge.
    fn as_any(&self) -> &dyn Any;
}

/// Handle to an LCM instance, for LCM-based bridges.
pub type LcmHandle = Arc<dyn Any + Send + Sync>;

/// Arguments every bridge constructor receives.
pub struct BridgeRequest<'a> {
    pub simulator: Arc<dyn Simulator>,
    pub robot_config: &'a RobotConfig,
    pub bridge_config: &'a BridgeConfig,
    pub lcm: Option<LcmHandle>,
}

/// Constructor advertised under the `holosoma.bridge` group.
pub type BridgeConstructor =
    Arc<dyn Fn(BridgeRequest<'_>) -> anyhow::Result<Box<dyn Bridge>> + Send + Sync>;

/// Registry of bridge constructors.
pub type BridgeRegistry = Registry<BridgeConstructor>;

/// Create the bridge selected by `robot_config.bridge.sdk_type`.
///
/// Every call constructs a new bridge; only the constructor is cached.
pub fn create_sdk2py_bridge(
    registry: &BridgeRegistry,
    simulator: Arc<dyn Simulator>,
    robot_config: &RobotConfig,
    bridge_config: &BridgeConfig,
    lcm: Option<LcmHandle>,
) -> PluginResult<Box<dyn Bridge>> {
    factory::create(
        registry,
        "sdk_type",
        &robot_config.bridge.sdk_type,
        |constructor| {
            constructor(BridgeRequest {
                simulator,
                robot_config,
                bridge_config,
                lcm,
            })
        },
    )
}
