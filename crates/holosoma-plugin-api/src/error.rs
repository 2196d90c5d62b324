//! Error types for backend selection.

use holosoma_runtime::RuntimeError;
use thiserror::Error;

/// Errors returned by the bridge and SDK-interface factories.
#[derive(Error, Debug)]
pub enum PluginError {
    /// The configured name is not registered in its capability group.
    #[error("Unsupported {selector}: {requested}. Available: [{}]", .available.join(", "))]
    Configuration {
        /// Configuration field the name was read from.
        selector: &'static str,
        /// Name that was requested.
        requested: String,
        /// Group that was searched.
        group: String,
        /// Every name registered in the group, sorted.
        available: Vec<String>,
    },

    /// The backend failed to load. This is the backend's own error.
    #[error(transparent)]
    Resolution(anyhow::Error),

    /// The backend's constructor failed. This is the backend's own error.
    #[error(transparent)]
    Construction(anyhow::Error),

    /// Discovery failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl PluginError {
    /// Check if this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, PluginError::Configuration { .. })
    }

    /// The backend error behind a resolution or construction failure.
    pub fn backend_error(&self) -> Option<&anyhow::Error> {
        match self {
            PluginError::Resolution(e) | PluginError::Construction(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for plugin operations.
pub type PluginResult<T> = std::result::Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_message_lists_available() {
        let err = PluginError::Configuration {
            selector: "sdk_type",
            requested: "z".to_string(),
            group: "holosoma.sdk".to_string(),
            available: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        };

        assert_eq!(err.to_string(), "Unsupported sdk_type: z. Available: [a, b, c]");
        assert!(err.is_configuration());
        assert!(err.backend_error().is_none());
    }

    #[test]
    fn test_resolution_is_transparent() {
        let err = PluginError::Resolution(anyhow::anyhow!("No module named 'rclpy'"));

        assert_eq!(err.to_string(), "No module named 'rclpy'");
        assert!(err.backend_error().is_some());
    }
}
