//! Device errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors loading, saving or validating a device.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Reading or writing a device file failed.
    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A device file is not valid JSON for the device model.
    #[error("failed to parse device '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing a device failed.
    #[error("failed to serialize device: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A component name is neither PascalCase nor a number.
    #[error("component name '{name}' is not PascalCase")]
    InvalidName { name: String },

    /// A parent device file was not found on the search path.
    #[error("cannot find {file} in {paths:?}")]
    NotFound { file: String, paths: Vec<PathBuf> },
}

/// Result alias for device operations.
pub type Result<T> = std::result::Result<T, DeviceError>;
