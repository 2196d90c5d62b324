//! # holosoma-plugin-api
//!
//! Capability groups Holosoma selects backends for at runtime.
//!
//! This crate provides the bridge between the entry-point runtime and the
//! code that drives a robot. It defines:
//!
//! - The [`Bridge`] interface and [`create_sdk2py_bridge`] factory, selected by
//!   `robot_config.bridge.sdk_type` from the `holosoma.bridge` group
//! - The [`SdkInterface`] interface and [`create_interface`] factory, selected
//!   by `robot_config.sdk_type` from the `holosoma.sdk` group
//! - [`PluginHost`], which discovers both groups once and owns their registries
//!
//! ## Backend Development
//!
//! A backend advertises a constructor in its package manifest and exports the
//! same reference into the host's [`Symbols`]. The constructor is looked up
//! only when its name is selected, so a backend whose dependencies are missing
//! never gets in the way of another.

pub mod bridge;
pub mod config;
pub mod error;
mod factory;
pub mod host;
pub mod sdk;

pub use bridge::{
    create_sdk2py_bridge, Bridge, BridgeConstructor, BridgeRegistry, BridgeRequest, LcmHandle,
    Simulator,
};
pub use config::{BridgeConfig, RobotBridgeConfig, RobotConfig};
pub use error::{PluginError, PluginResult};
pub use host::{EntryPointInfo, PluginHost, Symbols};
pub use sdk::{
    create_interface, InterfaceConstructor, InterfaceOptions, InterfaceRequest, SdkInterface,
    SdkRegistry,
};
