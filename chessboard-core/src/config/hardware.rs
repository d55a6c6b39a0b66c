//! Sensor hardware configuration
//!
//! Pin assignments and thresholds for each sensor topology. Pin numbers
//! are GPIO numbers; the firmware claims them from its pin bank at boot.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Quiescent output of a linear Hall sensor on the 10-bit analog scale
pub const DEFAULT_HALL_MIDPOINT: u16 = 512;

/// Hall deviation threshold of the reference build
pub const DEFAULT_HALL_THRESHOLD: u16 = 10;

/// Analog matrix column threshold: about half full-scale
pub const DEFAULT_COLUMN_THRESHOLD: u16 = 512;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Active-low pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Input with the internal pull-up enabled
    pub const fn with_pullup(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: true,
        }
    }
}

/// Order in which a byte travels through a shift register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BitOrder {
    /// Bit 0 first (the reference wiring)
    #[default]
    LsbFirst,
    MsbFirst,
}

/// Strobed row driver (74HC595) plus parallel-load column reader (74HC165)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShiftRegisterConfig {
    /// Row driver serial data (SER)
    pub row_data: PinConfig,
    /// Row driver shift clock (SRCLK)
    pub row_clock: PinConfig,
    /// Row driver storage latch (RCLK)
    pub row_latch: PinConfig,
    /// Column reader parallel load (~PL, active-low)
    pub col_load: PinConfig,
    /// Column reader shift clock (CP)
    pub col_clock: PinConfig,
    /// Column reader serial output (Q7)
    pub col_data: PinConfig,
    /// Bit order of both registers
    pub bit_order: BitOrder,
}

impl Default for ShiftRegisterConfig {
    fn default() -> Self {
        Self {
            row_data: PinConfig::new(2),
            row_clock: PinConfig::new(3),
            row_latch: PinConfig::new(4),
            col_load: PinConfig::inverted(5),
            col_clock: PinConfig::new(6),
            col_data: PinConfig::new(7),
            bit_order: BitOrder::LsbFirst,
        }
    }
}

/// One matrix column input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColumnConfig {
    /// Digital input, low = contact closed
    Digital(PinConfig),
    /// Analog input with an external pull-up; below `threshold` = closed
    Analog { pin: u8, threshold: u16 },
}

impl ColumnConfig {
    pub const fn pin(&self) -> u8 {
        match self {
            ColumnConfig::Digital(pin) => pin.pin,
            ColumnConfig::Analog { pin, .. } => *pin,
        }
    }
}

/// Direct GPIO row/column matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatrixConfig {
    /// Open-drain row selects, driven low to scan
    pub rows: [PinConfig; 8],
    pub columns: [ColumnConfig; 8],
}

impl Default for MatrixConfig {
    fn default() -> Self {
        let mut rows = [PinConfig::default(); 8];
        let mut columns = [ColumnConfig::Digital(PinConfig::default()); 8];
        for i in 0..8u8 {
            rows[i as usize] = PinConfig::new(2 + i);
            columns[i as usize] = ColumnConfig::Digital(PinConfig::with_pullup(10 + i));
        }
        Self { rows, columns }
    }
}

/// Linear Hall sensors behind four 16:1 multiplexers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HallConfig {
    /// Enable line per multiplexer bank
    pub bank_enable: [PinConfig; 4],
    /// Channel select lines S0..S3
    pub select: [PinConfig; 4],
    /// Shared analog input (ADC-capable GPIO)
    pub analog: u8,
    /// Quiescent sensor output
    pub midpoint: u16,
    /// Deviation from `midpoint` above which a square is occupied
    pub threshold: u16,
}

impl Default for HallConfig {
    fn default() -> Self {
        Self {
            bank_enable: [
                PinConfig::inverted(2),
                PinConfig::inverted(3),
                PinConfig::inverted(4),
                PinConfig::inverted(5),
            ],
            select: [
                PinConfig::new(6),
                PinConfig::new(7),
                PinConfig::new(8),
                PinConfig::new(9),
            ],
            analog: 26,
            midpoint: DEFAULT_HALL_MIDPOINT,
            threshold: DEFAULT_HALL_THRESHOLD,
        }
    }
}

/// Sensor topology, chosen once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SensorConfig {
    ShiftRegister(ShiftRegisterConfig),
    Matrix(MatrixConfig),
    Hall(HallConfig),
    /// No sensors; squares are toggled from the console
    Simulated,
}

impl SensorConfig {
    /// Short name for logs
    pub const fn name(&self) -> &'static str {
        match self {
            SensorConfig::ShiftRegister(_) => "shift_register",
            SensorConfig::Matrix(_) => "matrix",
            SensorConfig::Hall(_) => "hall",
            SensorConfig::Simulated => "simulated",
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        SensorConfig::ShiftRegister(ShiftRegisterConfig::default())
    }
}
