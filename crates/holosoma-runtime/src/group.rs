//! Capability groups.
//!
//! A capability group partitions the entry-point namespace. Names are only
//! meaningful within their group; two groups never share a registry.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Identifier of a capability group, e.g. `holosoma.bridge`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityGroup(Cow<'static, str>);

impl CapabilityGroup {
    /// Bridges between a simulator and a robot's control interface.
    pub const BRIDGE: CapabilityGroup = CapabilityGroup(Cow::Borrowed("holosoma.bridge"));

    /// SDK interfaces for robot communication.
    pub const SDK: CapabilityGroup = CapabilityGroup(Cow::Borrowed("holosoma.sdk"));

    /// Create a group from an arbitrary identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Get the group identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CapabilityGroup {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CapabilityGroup {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}
