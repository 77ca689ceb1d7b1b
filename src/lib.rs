//! # itemmem: triggered item-memory binding for HDC
//!
//! One stage of a hyperdimensional computing (HDC) pipeline. On each
//! trigger, the encoder draws two random hypervectors, an item-memory
//! (identity/position) vector and a continuous item-memory (quantized
//! value) vector, and binds them into an output vector.
//!
//! ## Quick Start
//!
//! ```rust
//! use itemmem::{BindingEncoder, EncoderConfig, Representation};
//!
//! let config = EncoderConfig::new(10_000, Representation::Bipolar);
//! let mut encoder = BindingEncoder::new(config)?;
//!
//! let publication = encoder.encode_cycle();
//! assert_eq!(publication.output().dimensions(), 10_000);
//! # Ok::<(), itemmem::ItemMemError>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **Hypervector**: fixed-length buffer of {0, 1} (binary) or {-1, 1} (bipolar)
//! - **Bind**: XOR for binary, element-wise multiply for bipolar; self-inverse
//! - **Cycle**: Idle → Generating → Binding → Publishing → Cooldown
//! - **Harness**: drives the trigger on a simulated clock and traces to VCD

pub mod clock;
pub mod config;
pub mod encoder;
pub mod error;
pub mod generator;
pub mod harness;
pub mod primitives;
pub mod representation;
pub mod signals;
pub mod trace;
pub mod vector;

// Re-exports for convenience
pub use clock::SimClock;
pub use config::{EncoderConfig, HarnessConfig};
pub use encoder::{BindingEncoder, EncoderHandle, EncoderState, Publication, PublicationRx};
pub use error::{ItemMemError, Result};
pub use generator::HypervectorGenerator;
pub use harness::{simulation_runtime, Harness, HarnessReport};
pub use primitives::Primitives;
pub use representation::Representation;
pub use signals::{Signals, TriggerLine};
pub use trace::{TraceRecorder, VcdWriter, VectorChannels};
pub use vector::Hypervector;
