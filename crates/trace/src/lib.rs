//! uwave Trace Model
//!
//! Defines the on-disk contract for raw accelerometer recordings:
//! - **Samples:** Timestamped per-axis integer readings, one JSON object per line
//! - **Trace:** Optional header plus the sample stream, loaded from and saved to JSONL
//! - **Synthetic:** Deterministic motion generators for demos and tests

pub mod sample;
pub mod synthetic;
pub mod trace;

pub use sample::*;
pub use synthetic::*;
pub use trace::*;
