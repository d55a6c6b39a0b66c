//! RP2040-specific HAL for the chessboard firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `chessboard-hal` traits, plus RP2040-specific functionality:
//!
//! - Dynamic pin allocation for config-driven setup
//! - ADC channel management
//! - Push-pull, open-drain and input pin wrappers

#![no_std]

pub mod adc;
pub mod gpio;
pub mod pins;

pub use adc::{AdcInput, SharedAdc};
pub use gpio::{GpioInput, GpioOutput, OpenDrain};
pub use pins::{AnalogBank, FixedPeripherals, PinBank, PinError};
