//! Multiplexed linear Hall scanner
//!
//! 64 analog Hall sensors behind four 16:1 multiplexers sharing one analog
//! input. Each bank is enabled in turn and its sixteen channels are selected
//! through four select lines; square `bank * 16 + channel` is occupied when
//! the reading deviates from the quiescent midpoint by more than the
//! threshold, in either direction.
//!
//! The midpoint is a fixed configuration value. There is no per-sensor
//! calibration or drift compensation.

use chessboard_core::{Bitboard, BoardSampler, ScanBuilder};
use chessboard_hal::{AnalogInput, OutputPin};
use embedded_hal::delay::DelayNs;

use super::MUX_SETTLE_US;

/// Channels per multiplexer
pub const CHANNELS_PER_BANK: u8 = 16;

/// Whether `sample` is far enough from `midpoint` to mean a magnet
pub const fn classify(sample: u16, midpoint: u16, threshold: u16) -> bool {
    sample.abs_diff(midpoint) > threshold
}

/// Bank-enable / channel-select / analog-read scanner
pub struct HallScanner<O, A, D> {
    /// Logical enable per bank (active-low lines are configured inverted)
    enables: [O; 4],
    /// S0..S3, S0 being the least significant select bit
    select: [O; 4],
    input: A,
    midpoint: u16,
    threshold: u16,
    delay: D,
    flip: bool,
}

impl<O: OutputPin, A: AnalogInput, D: DelayNs> HallScanner<O, A, D> {
    /// Create a scanner with every bank disabled
    pub fn new(
        enables: [O; 4],
        select: [O; 4],
        input: A,
        midpoint: u16,
        threshold: u16,
        delay: D,
        flip: bool,
    ) -> Self {
        let mut scanner = Self {
            enables,
            select,
            input,
            midpoint,
            threshold,
            delay,
            flip,
        };
        for enable in scanner.enables.iter_mut() {
            enable.set_low();
        }
        scanner
    }

    fn select_channel(&mut self, channel: u8) {
        for (bit, line) in self.select.iter_mut().enumerate() {
            line.set_state((channel >> bit) & 1 == 1);
        }
    }
}

impl<O: OutputPin, A: AnalogInput, D: DelayNs> BoardSampler for HallScanner<O, A, D> {
    fn sample(&mut self) -> Bitboard {
        let mut scan = ScanBuilder::new(self.flip);
        for bank in 0..self.enables.len() {
            self.enables[bank].set_high();
            for channel in 0..CHANNELS_PER_BANK {
                self.select_channel(channel);
                self.delay.delay_us(MUX_SETTLE_US);
                // A failed conversion reads as quiescent
                let occupied = self
                    .input
                    .read()
                    .map(|v| classify(v, self.midpoint, self.threshold))
                    .unwrap_or(false);
                scan.write(bank as u8 * CHANNELS_PER_BANK + channel, occupied);
            }
            self.enables[bank].set_low();
        }
        scan.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::tests::NoDelay;
    use chessboard_hal::AnalogError;
    use core::cell::RefCell;

    struct Bench {
        /// Sensor outputs by square
        values: [u16; 64],
        enabled: [bool; 4],
        select: [bool; 4],
        /// Set when a read happened with other than one bank enabled
        bad_read: bool,
    }

    impl Bench {
        fn new() -> Self {
            Self {
                values: [512; 64],
                enabled: [true; 4],
                select: [false; 4],
                bad_read: false,
            }
        }
    }

    enum Line {
        Enable(usize),
        Select(usize),
    }

    struct Pin<'a> {
        line: Line,
        bench: &'a RefCell<Bench>,
    }

    impl OutputPin for Pin<'_> {
        fn set_high(&mut self) {
            self.set_state(true);
        }

        fn set_low(&mut self) {
            self.set_state(false);
        }

        fn set_state(&mut self, high: bool) {
            let mut bench = self.bench.borrow_mut();
            match self.line {
                Line::Enable(i) => bench.enabled[i] = high,
                Line::Select(i) => bench.select[i] = high,
            }
        }
    }

    struct Adc<'a> {
        bench: &'a RefCell<Bench>,
    }

    impl AnalogInput for Adc<'_> {
        fn read(&mut self) -> Result<u16, AnalogError> {
            let mut bench = self.bench.borrow_mut();
            let enabled: heapless::Vec<usize, 4> = (0..4).filter(|b| bench.enabled[*b]).collect();
            if enabled.len() != 1 {
                bench.bad_read = true;
                return Err(AnalogError::Conversion);
            }
            let channel = (0..4).fold(0, |acc, bit| acc | (usize::from(bench.select[bit]) << bit));
            Ok(bench.values[enabled[0] * 16 + channel])
        }
    }

    fn scanner(bench: &RefCell<Bench>) -> HallScanner<Pin<'_>, Adc<'_>, NoDelay> {
        let enables = core::array::from_fn(|i| Pin {
            line: Line::Enable(i),
            bench,
        });
        let select = core::array::from_fn(|i| Pin {
            line: Line::Select(i),
            bench,
        });
        HallScanner::new(enables, select, Adc { bench }, 512, 10, NoDelay, false)
    }

    #[test]
    fn test_classify_both_polarities() {
        assert!(classify(530, 512, 10));
        assert!(classify(490, 512, 10));
        assert!(!classify(522, 512, 10));
        assert!(!classify(502, 512, 10));
        assert!(!classify(512, 512, 10));
    }

    #[test]
    fn test_bank_channel_addressing() {
        let bench = RefCell::new(Bench::new());
        {
            let mut b = bench.borrow_mut();
            b.values[0] = 700; // bank 0, channel 0
            b.values[21] = 300; // bank 1, channel 5
            b.values[47] = 523; // bank 2, channel 15
            b.values[63] = 522; // exactly at the threshold
        }
        let mut scanner = scanner(&bench);

        let expected = (1 << 0) | (1 << 21) | (1 << 47);
        assert_eq!(scanner.sample(), Bitboard::new(expected));

        let bench = bench.borrow();
        assert!(!bench.bad_read);
        assert_eq!(bench.enabled, [false; 4]);
    }

    #[test]
    fn test_quiet_board_is_empty() {
        let bench = RefCell::new(Bench::new());
        let mut scanner = scanner(&bench);
        assert_eq!(scanner.sample(), Bitboard::EMPTY);
    }
}
