//! Chessboard Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the sensor samplers
//! and the controller-side reader are written against. Chip-specific crates
//! (currently RP2040) implement them, and host tests implement them with
//! mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  chessboard-drivers (samplers, reader)   │
//! └──────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌──────────────────────────────────────────┐
//! │  chessboard-hal (this crate - traits)    │
//! └──────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ chessboard-   │       │  test mocks   │
//! │ hal-rp2040    │       │  (host)       │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`adc::AnalogInput`] - Single-channel analog sampling
//! - [`i2c::I2cBus`] - I2C bus master operations
//!
//! Timing holds are not abstracted here: drivers take an
//! `embedded_hal::delay::DelayNs`.

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use adc::{AnalogError, AnalogInput};
pub use gpio::{InputPin, OutputPin};
pub use i2c::I2cBus;
