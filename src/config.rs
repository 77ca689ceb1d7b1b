//! Configuration for the encoder and its simulation harness.
//!
//! Both structs deserialize from JSON; missing fields take their defaults.

use crate::error::{ItemMemError, Result};
use crate::representation::Representation;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default hypervector dimensionality.
pub const DEFAULT_DIMENSIONS: usize = 10_000;

/// Default minimum spacing between cycles, in nanoseconds.
pub const DEFAULT_COOLDOWN_NS: u64 = 10;

/// Encoder configuration. Fixed for the lifetime of an encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Hypervector length.
    /// Default: 10,000.
    pub dimensions: usize,

    /// Element representation and binding operator.
    /// Default: binary.
    pub representation: Representation,

    /// Simulated idle time after each publish before the next trigger is honored.
    /// Default: 10 ns.
    pub cooldown_ns: u64,

    /// Seed for reproducible generation.
    /// Default: None (fresh OS entropy every call).
    pub seed: Option<u64>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_DIMENSIONS,
            representation: Representation::Binary,
            cooldown_ns: DEFAULT_COOLDOWN_NS,
            seed: None,
        }
    }
}

impl EncoderConfig {
    /// Config with the given dimensions and representation, other fields default.
    pub fn new(dimensions: usize, representation: Representation) -> Self {
        Self {
            dimensions,
            representation,
            ..Self::default()
        }
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the cooldown.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown_ns = cooldown.as_nanos().min(u64::MAX as u128) as u64;
        self
    }

    /// Cooldown as a [`Duration`].
    pub fn cooldown(&self) -> Duration {
        Duration::from_nanos(self.cooldown_ns)
    }

    /// Reject configurations the encoder cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions == 0 {
            return Err(ItemMemError::InvalidDimensions(self.dimensions));
        }
        if self.cooldown_ns == 0 {
            return Err(ItemMemError::InvalidCooldown(self.cooldown_ns));
        }
        Ok(())
    }
}

/// Harness configuration: encoder config plus the stimulus schedule and trace sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Encoder settings.
    pub encoder: EncoderConfig,

    /// Simulated time the trigger is held low before being raised.
    /// Default: 10 ns.
    pub settle_ns: u64,

    /// Time simulated after the trigger is raised.
    /// Default: 60 s.
    pub observe_ns: u64,

    /// VCD output path. `None` disables tracing.
    /// Default: `traces.vcd`.
    pub trace_path: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            encoder: EncoderConfig::default(),
            settle_ns: 10,
            observe_ns: 60_000_000_000,
            trace_path: Some(PathBuf::from("traces.vcd")),
        }
    }
}

impl HarnessConfig {
    /// Load from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Settle time as a [`Duration`].
    pub fn settle(&self) -> Duration {
        Duration::from_nanos(self.settle_ns)
    }

    /// Observation window as a [`Duration`].
    pub fn observe(&self) -> Duration {
        Duration::from_nanos(self.observe_ns)
    }

    /// Validate the embedded encoder config.
    pub fn validate(&self) -> Result<()> {
        self.encoder.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = EncoderConfig::default();
        assert_eq!(c.dimensions, 10_000);
        assert_eq!(c.representation, Representation::Binary);
        assert_eq!(c.cooldown(), Duration::from_nanos(10));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_zero_dimensions_invalid() {
        let c = EncoderConfig::new(0, Representation::Bipolar);
        assert!(matches!(c.validate(), Err(ItemMemError::InvalidDimensions(0))));
    }

    #[test]
    fn test_zero_cooldown_invalid() {
        let c = EncoderConfig::default().with_cooldown(Duration::ZERO);
        assert!(matches!(c.validate(), Err(ItemMemError::InvalidCooldown(0))));
    }

    #[test]
    fn test_partial_json() {
        let c = HarnessConfig::from_json(
            r#"{"encoder": {"dimensions": 64, "representation": "bipolar"}, "trace_path": null}"#,
        )
        .unwrap();
        assert_eq!(c.encoder.dimensions, 64);
        assert_eq!(c.encoder.representation, Representation::Bipolar);
        assert_eq!(c.encoder.cooldown_ns, DEFAULT_COOLDOWN_NS);
        assert_eq!(c.observe(), Duration::from_secs(60));
        assert!(c.trace_path.is_none());
    }

    #[test]
    fn test_bad_json() {
        let err = HarnessConfig::from_json(r#"{"encoder": {"representation": "ternary"}}"#)
            .unwrap_err();
        assert!(matches!(err, ItemMemError::ConfigParse(_)));
    }
}
