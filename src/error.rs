//! Error types

use thiserror::Error;

use crate::sim::ObjectKind;

/// Failures that prevent a session from starting
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("viewport has unusable size {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("render surface holds {available} {kind} slots, session needs {required}")]
    SurfaceTooSmall {
        kind: ObjectKind,
        available: usize,
        required: usize,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration loading and validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Score board file failures
#[derive(Debug, Error)]
pub enum ScoreBoardError {
    #[error("score board I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse score board: {0}")]
    Parse(#[from] serde_json::Error),
}
