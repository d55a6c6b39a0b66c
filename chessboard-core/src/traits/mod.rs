//! Hardware abstraction traits
//!
//! These traits define the interface between the acquisition pipeline
//! and the sensor-specific scan strategies.

pub mod sampler;

pub use sampler::{BoardSampler, ScanBuilder};
