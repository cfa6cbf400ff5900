//! Error types for the voxel world.
//!
//! The world itself never fails: out-of-range reads and writes are sentinels
//! and no-ops. Errors only come from the configuration surface.

use thiserror::Error;

/// Main error type for the crate.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result alias used by fallible entry points.
pub type Result<T> = std::result::Result<T, WorldError>;
