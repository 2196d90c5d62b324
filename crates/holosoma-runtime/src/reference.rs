//! Entry-point references.
//!
//! A reference locates a loadable implementation as `module.path:attribute`,
//! e.g. `holosoma_ext_unitree.bridge:UnitreeSdk2Bridge`. The attribute may
//! itself be dotted to name a nested item.

use crate::error::{RuntimeError, RuntimeResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A parsed `module.path:attribute` reference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryPointRef {
    module: String,
    attr: String,
}

impl EntryPointRef {
    /// Parse a reference string.
    pub fn parse(s: &str) -> RuntimeResult<Self> {
        let s = s.trim();
        let (module, attr) = s.split_once(':').ok_or_else(|| {
            RuntimeError::InvalidReference(format!("'{}' is missing ':attribute'", s))
        })?;

        if !is_dotted_path(module) {
            return Err(RuntimeError::InvalidReference(format!(
                "'{}' has an invalid module path",
                s
            )));
        }

        if !is_dotted_path(attr) {
            return Err(RuntimeError::InvalidReference(format!(
                "'{}' has an invalid attribute",
                s
            )));
        }

        Ok(Self {
            module: module.to_string(),
            attr: attr.to_string(),
        })
    }

    /// Module part of the reference.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Attribute part of the reference.
    pub fn attr(&self) -> &str {
        &self.attr
    }
}

fn is_dotted_path(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_identifier)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl fmt::Display for EntryPointRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.attr)
    }
}

impl FromStr for EntryPointRef {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for EntryPointRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntryPointRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
