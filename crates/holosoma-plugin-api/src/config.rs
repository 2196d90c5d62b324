//! Configuration types the factories read their selectors from.
//!
//! Only the selector fields are interpreted here. Everything else a robot or
//! simulator configuration carries is kept in `extra` and handed to the
//! backend untouched.

use serde::{Deserialize, Serialize};

/// Robot configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotConfig {
    /// SDK interface to communicate with the robot through.
    #[serde(default)]
    pub sdk_type: String,

    /// Bridge selection for simulation.
    #[serde(default)]
    pub bridge: RobotBridgeConfig,

    /// Fields not interpreted by the plugin layer.
    #[serde(flatten)]
    pub extra: toml::Table,
}

/// Bridge section of a robot configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotBridgeConfig {
    /// Bridge to mediate between the simulator and the robot interface.
    #[serde(default)]
    pub sdk_type: String,

    /// Fields not interpreted by the plugin layer.
    #[serde(flatten)]
    pub extra: toml::Table,
}

/// Simulator-level bridge settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Fields not interpreted by the plugin layer.
    #[serde(flatten)]
    pub extra: toml::Table,
}

impl RobotConfig {
    /// Create a config selecting `sdk_type` as the SDK interface.
    pub fn with_sdk(sdk_type: impl Into<String>) -> Self {
        Self {
            sdk_type: sdk_type.into(),
            ..Default::default()
        }
    }

    /// Create a config selecting `sdk_type` as the bridge.
    pub fn with_bridge(sdk_type: impl Into<String>) -> Self {
        Self {
            bridge: RobotBridgeConfig {
                sdk_type: sdk_type.into(),
                extra: toml::Table::new(),
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_and_extra_fields() {
        let config: RobotConfig = toml::from_str(
            r#"
sdk_type = "unitree"
robot_type = "g1_29dof"

[bridge]
sdk_type = "basic"
kp = 100.0
"#,
        )
        .unwrap();

        assert_eq!(config.sdk_type, "unitree");
        assert_eq!(config.bridge.sdk_type, "basic");
        assert_eq!(
            config.extra.get("robot_type").and_then(|v| v.as_str()),
            Some("g1_29dof")
        );
        assert!(config.bridge.extra.contains_key("kp"));
    }

    #[test]
    fn test_builders() {
        assert_eq!(RobotConfig::with_sdk("ros2").sdk_type, "ros2");
        assert_eq!(RobotConfig::with_bridge("basic").bridge.sdk_type, "basic");
        assert!(RobotConfig::with_bridge("basic").sdk_type.is_empty());
    }
}
