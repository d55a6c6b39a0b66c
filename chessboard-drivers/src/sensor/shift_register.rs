//! Shift-register scanner
//!
//! Rows are driven through a 74HC595 (serial in, latched parallel out) and
//! columns are read through a 74HC165 (parallel load, serial out). One pass
//! energizes each row in turn with a one-hot pattern, loads the eight column
//! contacts, and shifts them in.
//!
//! Pin levels are logical: an active-low line such as the 165's `~PL` is
//! configured inverted, and the driver asserts it by setting it high.

use chessboard_core::config::BitOrder;
use chessboard_core::{Bitboard, BoardSampler, ScanBuilder};
use chessboard_hal::{InputPin, OutputPin};
use embedded_hal::delay::DelayNs;

use super::{ROW_SETTLE_US, STROBE_HOLD_NS};

/// Pins of the two shift registers
pub struct ShiftRegisterPins<O, I> {
    /// 595 serial data (SER)
    pub row_data: O,
    /// 595 shift clock (SRCLK)
    pub row_clock: O,
    /// 595 storage latch (RCLK), latches on the rising edge
    pub row_latch: O,
    /// 165 parallel load, asserted to capture the columns
    pub col_load: O,
    /// 165 shift clock (CP)
    pub col_clock: O,
    /// 165 serial output (Q7)
    pub col_data: I,
}

/// Strobed row / shifted column scanner
pub struct ShiftRegisterScanner<O, I, D> {
    pins: ShiftRegisterPins<O, I>,
    bit_order: BitOrder,
    delay: D,
    flip: bool,
}

impl<O: OutputPin, I: InputPin, D: DelayNs> ShiftRegisterScanner<O, I, D> {
    /// Create a scanner and put every line in its idle state
    ///
    /// `flip` folds the horizontal flip into bit assignment.
    pub fn new(pins: ShiftRegisterPins<O, I>, bit_order: BitOrder, delay: D, flip: bool) -> Self {
        let mut scanner = Self {
            pins,
            bit_order,
            delay,
            flip,
        };
        scanner.pins.row_latch.set_high();
        scanner.pins.row_clock.set_low();
        scanner.pins.row_data.set_low();
        scanner.pins.col_clock.set_low();
        scanner.pins.col_load.set_low();
        scanner.write_rows(0);
        scanner
    }

    /// Shift `pattern` into the row driver and latch it
    fn write_rows(&mut self, pattern: u8) {
        self.pins.row_latch.set_low();
        for i in 0..8 {
            let bit = match self.bit_order {
                BitOrder::LsbFirst => (pattern >> i) & 1,
                BitOrder::MsbFirst => (pattern >> (7 - i)) & 1,
            };
            self.pins.row_data.set_state(bit == 1);
            self.pins.row_clock.set_high();
            self.delay.delay_ns(STROBE_HOLD_NS);
            self.pins.row_clock.set_low();
            self.delay.delay_ns(STROBE_HOLD_NS);
        }
        self.pins.row_latch.set_high();
        self.delay.delay_ns(STROBE_HOLD_NS);
    }

    /// Load the column contacts and shift them in
    fn read_columns(&mut self) -> u8 {
        self.pins.col_load.set_high();
        self.delay.delay_ns(STROBE_HOLD_NS);
        self.pins.col_load.set_low();
        self.delay.delay_ns(STROBE_HOLD_NS);

        let mut byte = 0u8;
        for i in 0..8 {
            let bit = u8::from(self.pins.col_data.is_high());
            byte |= match self.bit_order {
                BitOrder::LsbFirst => bit << i,
                BitOrder::MsbFirst => bit << (7 - i),
            };
            self.pins.col_clock.set_high();
            self.delay.delay_ns(STROBE_HOLD_NS);
            self.pins.col_clock.set_low();
            self.delay.delay_ns(STROBE_HOLD_NS);
        }
        byte
    }

    /// Give the pins back
    pub fn release(self) -> ShiftRegisterPins<O, I> {
        self.pins
    }
}

impl<O: OutputPin, I: InputPin, D: DelayNs> BoardSampler for ShiftRegisterScanner<O, I, D> {
    fn sample(&mut self) -> Bitboard {
        let mut scan = ScanBuilder::new(self.flip);
        for row in 0..8u8 {
            self.write_rows(1 << row);
            self.delay.delay_us(ROW_SETTLE_US);
            let columns = self.read_columns();
            scan.set_row(row, columns);
        }
        // Never leave a row energized between passes
        self.write_rows(0);
        scan.finish()
    }
}
