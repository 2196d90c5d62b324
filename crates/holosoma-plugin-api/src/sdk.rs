//! Robot SDK interfaces.
//!
//! An SDK interface mediates robot communication for a vendor SDK. Which one
//! is used is decided by `robot_config.sdk_type` and looked up in the
//! `holosoma.sdk` capability group.

use crate::config::RobotConfig;
use crate::error::PluginResult;
use crate::factory;
use holosoma_runtime::Registry;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;

/// A constructed SDK interface instance.
pub trait SdkInterface: Send {
    /// The `sdk_type` this interface implements.
    fn sdk_type(&self) -> &str;

    /// Downcast support for callers that need the concrete interface.
    fn as_any(&self) -> &dyn Any;
}

/// Connection options passed to every SDK-interface constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceOptions {
    /// DDS domain to join.
    pub domain_id: u32,

    /// Network interface to bind, e.g. `eth0`. Backend default when unset.
    pub interface_str: Option<String>,

    /// Whether to read commands from a joystick.
    pub use_joystick: bool,
}

impl Default for InterfaceOptions {
    fn default() -> Self {
        Self {
            domain_id: 0,
            interface_str: None,
            use_joystick: true,
        }
    }
}

/// Arguments every SDK-interface constructor receives.
#[derive(Debug, Clone, Copy)]
pub struct InterfaceRequest<'a> {
    pub robot_config: &'a RobotConfig,
    pub domain_id: u32,
    pub interface_str: Option<&'a str>,
    pub use_joystick: bool,
}

/// Constructor advertised under the `holosoma.sdk` group.
pub type InterfaceConstructor =
    Arc<dyn Fn(InterfaceRequest<'_>) -> anyhow::Result<Box<dyn SdkInterface>> + Send + Sync>;

/// Registry of SDK-interface constructors.
pub type SdkRegistry = Registry<InterfaceConstructor>;

/// Create the SDK interface selected by `robot_config.sdk_type`.
///
/// Every call constructs a new interface; only the constructor is cached.
pub fn create_interface(
    registry: &SdkRegistry,
    robot_config: &RobotConfig,
    options: &InterfaceOptions,
) -> PluginResult<Box<dyn SdkInterface>> {
    factory::create(registry, "sdk_type", &robot_config.sdk_type, |constructor| {
        constructor(InterfaceRequest {
            robot_config,
            domain_id: options.domain_id,
            interface_str: options.interface_str.as_deref(),
            use_joystick: options.use_joystick,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use holosoma_runtime::{CapabilityGroup, EntryPoint, EntryPointRef, SymbolTable};

    struct EchoInterface {
        domain_id: u32,
        interface_str: Option<String>,
        use_joystick: bool,
    }

    impl SdkInterface for EchoInterface {
        fn sdk_type(&self) -> &str {
            "echo"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn registry() -> SdkRegistry {
        let constructor: InterfaceConstructor = Arc::new(
            |request: InterfaceRequest<'_>| -> anyhow::Result<Box<dyn SdkInterface>> {
                Ok(Box::new(EchoInterface {
                    domain_id: request.domain_id,
                    interface_str: request.interface_str.map(String::from),
                    use_joystick: request.use_joystick,
                }))
            },
        );

        let mut symbols = SymbolTable::new();
        symbols.export("holosoma_ext.echo:EchoInterface", constructor).unwrap();

        Registry::from_entry_points(
            CapabilityGroup::SDK,
            [EntryPoint {
                group: CapabilityGroup::SDK,
                name: "echo".to_string(),
                reference: EntryPointRef::parse("holosoma_ext.echo:EchoInterface").unwrap(),
                package: "holosoma-ext-echo".to_string(),
            }],
            Arc::new(symbols),
        )
        .unwrap()
    }

    #[test]
    fn test_default_options() {
        let options = InterfaceOptions::default();
        assert_eq!(options.domain_id, 0);
        assert!(options.interface_str.is_none());
        assert!(options.use_joystick);
    }

    #[test]
    fn test_create_interface_passes_options() {
        let registry = registry();
        let options = InterfaceOptions {
            domain_id: 7,
            interface_str: Some("eth0".to_string()),
            use_joystick: false,
        };

        let interface =
            create_interface(&registry, &RobotConfig::with_sdk("echo"), &options).unwrap();

        let echo = interface.as_any().downcast_ref::<EchoInterface>().unwrap();
        assert_eq!(echo.domain_id, 7);
        assert_eq!(echo.interface_str.as_deref(), Some("eth0"));
        assert!(!echo.use_joystick);
    }

    #[test]
    fn test_unknown_interface() {
        let registry = registry();

        let err = create_interface(
            &registry,
            &RobotConfig::with_sdk("Echo"),
            &InterfaceOptions::default(),
        )
        .err()
        .unwrap();

        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "Unsupported sdk_type: Echo. Available: [echo]");
    }
}
