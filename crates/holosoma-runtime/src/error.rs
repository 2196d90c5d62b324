//! Error types for the plugin runtime.

use thiserror::Error;

/// Errors that can occur while discovering or resolving entry points.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Failed to parse or validate a package manifest.
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// An entry-point reference is not of the form `module.path:attribute`.
    #[error("Invalid entry point reference: {0}")]
    InvalidReference(String),

    /// Two packages advertise the same name within one capability group.
    #[error(
        "Duplicate entry point '{name}' in group '{group}': advertised by both '{first}' and '{second}'"
    )]
    DuplicateEntryPoint {
        group: String,
        name: String,
        first: String,
        second: String,
    },

    /// No symbol has been exported under the requested reference.
    #[error("No symbol exported for entry point reference: {0}")]
    SymbolNotFound(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;
