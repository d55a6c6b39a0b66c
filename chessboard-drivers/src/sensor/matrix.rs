//! GPIO matrix scanner
//!
//! Eight open-drain row lines and eight column inputs. A row is selected by
//! pulling it low; a closed contact then pulls its column low as well.
//! Columns normally use the pin's own pull-up. A column wired to an analog
//! input (external pull-up) is read against a threshold instead.

use chessboard_core::{Bitboard, BoardSampler, ScanBuilder};
use chessboard_hal::{AnalogInput, InputPin, OutputPin};
use embedded_hal::delay::DelayNs;

use super::ROW_SETTLE_US;

/// How a column is sensed
pub enum ColumnSense<I, A> {
    /// Digital input with pull-up: low = closed
    PulledUp(I),
    /// Analog input with external pull-up: below `threshold` = closed
    Analog { input: A, threshold: u16 },
}

impl<I: InputPin, A: AnalogInput> ColumnSense<I, A> {
    /// Whether the contact on this column is closed
    ///
    /// A failed conversion reads as open.
    pub fn is_closed(&mut self) -> bool {
        match self {
            ColumnSense::PulledUp(pin) => pin.is_low(),
            ColumnSense::Analog { input, threshold } => {
                input.read().map(|v| v < *threshold).unwrap_or(false)
            }
        }
    }
}

/// Row-select / column-sense scanner
pub struct MatrixScanner<O, I, A, D> {
    rows: [O; 8],
    columns: [ColumnSense<I, A>; 8],
    delay: D,
    flip: bool,
}

impl<O: OutputPin, I: InputPin, A: AnalogInput, D: DelayNs> MatrixScanner<O, I, A, D> {
    /// Create a scanner with every row released
    pub fn new(rows: [O; 8], columns: [ColumnSense<I, A>; 8], delay: D, flip: bool) -> Self {
        let mut scanner = Self {
            rows,
            columns,
            delay,
            flip,
        };
        for row in scanner.rows.iter_mut() {
            row.set_high();
        }
        scanner
    }
}

impl<O: OutputPin, I: InputPin, A: AnalogInput, D: DelayNs> BoardSampler
    for MatrixScanner<O, I, A, D>
{
    fn sample(&mut self) -> Bitboard {
        let mut scan = ScanBuilder::new(self.flip);
        for (row, line) in self.rows.iter_mut().enumerate() {
            line.set_low();
            self.delay.delay_us(ROW_SETTLE_US);
            for (col, column) in self.columns.iter_mut().enumerate() {
                scan.write((row * 8 + col) as u8, column.is_closed());
            }
            line.set_high();
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
        board: u64,
        /// Row line levels (true = released)
        rows: [bool; 8],
        /// Largest number of rows selected at once
        max_selected: u32,
        adc_fails: bool,
    }

    impl Bench {
        fn new(board: u64) -> Self {
            Self {
                board,
                rows: [false; 8],
                max_selected: 0,
                adc_fails: false,
            }
        }

        fn closed(&self, col: usize) -> bool {
            self.rows
                .iter()
                .enumerate()
                .any(|(row, released)| !released && self.board & (1 << (row * 8 + col)) != 0)
        }
    }

    struct Row<'a> {
        index: usize,
        bench: &'a RefCell<Bench>,
    }

    impl OutputPin for Row<'_> {
        fn set_high(&mut self) {
            self.bench.borrow_mut().rows[self.index] = true;
        }

        fn set_low(&mut self) {
            let mut bench = self.bench.borrow_mut();
            bench.rows[self.index] = false;
            let selected = bench.rows.iter().filter(|r| !**r).count() as u32;
            bench.max_selected = bench.max_selected.max(selected);
        }
    }

    struct Column<'a> {
        index: usize,
        bench: &'a RefCell<Bench>,
    }

    impl InputPin for Column<'_> {
        fn is_high(&self) -> bool {
            !self.bench.borrow().closed(self.index)
        }
    }

    struct Adc<'a> {
        index: usize,
        bench: &'a RefCell<Bench>,
    }

    impl AnalogInput for Adc<'_> {
        fn read(&mut self) -> Result<u16, AnalogError> {
            let bench = self.bench.borrow();
            if bench.adc_fails {
                return Err(AnalogError::Conversion);
            }
            Ok(if bench.closed(self.index) { 80 } else { 990 })
        }
    }

    fn scanner(
        bench: &RefCell<Bench>,
        analog_last: bool,
    ) -> MatrixScanner<Row<'_>, Column<'_>, Adc<'_>, NoDelay> {
        let rows = core::array::from_fn(|index| Row { index, bench });
        let columns = core::array::from_fn(|index| {
            if analog_last && index == 7 {
                ColumnSense::Analog {
                    input: Adc { index, bench },
                    threshold: 512,
                }
            } else {
                ColumnSense::PulledUp(Column { index, bench })
            }
        });
        MatrixScanner::new(rows, columns, NoDelay, false)
    }

    #[test]
    fn test_rows_released_on_new() {
        let bench = RefCell::new(Bench::new(0));
        let _scanner = scanner(&bench, false);
        assert_eq!(bench.borrow().rows, [true; 8]);
    }

    #[test]
    fn test_scan_reads_each_row_alone() {
        let board = 0x8000_0000_0000_0001 | (1 << 27) | (1 << 36);
        let bench = RefCell::new(Bench::new(board));
        let mut scanner = scanner(&bench, false);

        assert_eq!(scanner.sample(), Bitboard::new(board));
        let bench = bench.borrow();
        assert_eq!(bench.max_selected, 1);
        assert_eq!(bench.rows, [true; 8]);
    }

    #[test]
    fn test_analog_column_threshold() {
        let board = (1 << 7) | (1 << 63) | (1 << 6);
        let bench = RefCell::new(Bench::new(board));
        let mut scanner = scanner(&bench, true);

        assert_eq!(scanner.sample(), Bitboard::new(board));
    }

    #[test]
    fn test_failed_conversion_reads_open() {
        let board = (1 << 7) | (1 << 0);
        let bench = RefCell::new(Bench::new(board));
        bench.borrow_mut().adc_fails = true;
        let mut scanner = scanner(&bench, true);

        assert_eq!(scanner.sample(), Bitboard::new(1));
    }
}
