//! Sensor sampler implementations
//!
//! Three interchangeable scan strategies behind `BoardSampler`:
//!
//! - Shift registers: 74HC595 row driver, 74HC165 column reader
//! - GPIO matrix: open-drain rows, pulled-up (or analog) columns
//! - Hall array: four 16:1 multiplexers on one analog input
//!
//! Each takes a `flip` flag so the horizontal flip can be folded into bit
//! assignment during the scan.

pub mod hall;
pub mod matrix;
pub mod shift_register;

pub use hall::HallScanner;
pub use matrix::{ColumnSense, MatrixScanner};
pub use shift_register::{ShiftRegisterPins, ShiftRegisterScanner};

/// Minimum clock, latch and load pulse width (74HC parts need about 100 ns)
pub const STROBE_HOLD_NS: u32 = 500;

/// Time for a newly selected row to settle before columns are read
pub const ROW_SETTLE_US: u32 = 5;

/// Time for a multiplexer output and the sensor behind it to settle
pub const MUX_SETTLE_US: u32 = 10;

#[cfg(test)]
pub(crate) mod tests {
    use embedded_hal::delay::DelayNs;

    /// Delay that returns immediately
    pub struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }
}
