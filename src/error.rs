//! Error types for the item-memory encoder.

use crate::representation::Representation;
use std::path::PathBuf;
use thiserror::Error;

/// Item-memory error types.
#[derive(Error, Debug)]
pub enum ItemMemError {
    /// Dimensionality must be positive
    #[error("Invalid dimensions: {0} (must be > 0)")]
    InvalidDimensions(usize),

    /// Cooldown must be a positive interval
    #[error("Invalid cooldown: {0} ns (must be > 0)")]
    InvalidCooldown(u64),

    /// Invalid vector dimensions
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Element outside the representation's domain
    #[error("Element outside the {0} domain")]
    InvalidElement(Representation),

    /// JSON parsing error
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// I/O failure while writing a trace or reading a config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The trace sink could not be opened
    #[error("Could not create trace file {}: {source}", path.display())]
    TraceSink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The encoder task ended before the harness finished with it
    #[error("Encoder stopped: {0}")]
    EncoderStopped(String),
}

/// Result type alias for item-memory operations.
pub type Result<T> = std::result::Result<T, ItemMemError>;
