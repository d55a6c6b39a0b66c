//! Dynamic pin allocation for config-driven hardware setup
//!
//! Provides a way to get GPIO pins by number at runtime, so the sensor
//! wiring comes from `board.toml` rather than from the source.
//!
//! A few pins are spoken for by fixed functions and never handed out:
//!
//! | GPIO | Function |
//! |------|----------|
//! | 0, 1 | UART0 console (TX, RX) |
//! | 20, 21 | I2C0 target (SDA, SCL) |
//! | 26-29 | ADC inputs, taken through [`AnalogBank`] |

use embassy_rp::adc::Channel;
use embassy_rp::gpio::{AnyPin, Pull};
use embassy_rp::peripherals::{
    ADC, I2C0, PIN_0, PIN_1, PIN_20, PIN_21, PIN_26, PIN_27, PIN_28, PIN_29, UART0,
};
use embassy_rp::{Peri, Peripherals};

/// Number of GPIO pins on RP2040
pub const GPIO_COUNT: u8 = 30;

/// Console UART transmit pin
pub const CONSOLE_TX: u8 = 0;
/// Console UART receive pin
pub const CONSOLE_RX: u8 = 1;
/// I2C target data pin
pub const I2C_SDA: u8 = 20;
/// I2C target clock pin
pub const I2C_SCL: u8 = 21;
/// First ADC-capable pin (ADC0)
pub const FIRST_ANALOG: u8 = 26;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken
    AlreadyTaken,
    /// Pin reserved for a fixed function
    Reserved,
    /// Analog input requested on a pin without an ADC channel
    NotAnalog,
}

/// Whether `pin` is held back for the console, the bus or the ADC
pub const fn is_reserved(pin: u8) -> bool {
    matches!(pin, CONSOLE_TX | CONSOLE_RX | I2C_SDA | I2C_SCL) || pin >= FIRST_ANALOG
}

/// Pin bank that holds the general-purpose GPIO pins and allows taking
/// them by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT as usize],
}

impl PinBank {
    /// Take a pin by number
    ///
    /// Returns the pin if available, or an error if:
    /// - Pin number is invalid (>= 30)
    /// - Pin is reserved for a fixed function
    /// - Pin was already taken
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        if pin_num >= GPIO_COUNT {
            return Err(PinError::InvalidPin);
        }
        if is_reserved(pin_num) {
            return Err(PinError::Reserved);
        }
        self.pins[pin_num as usize]
            .take()
            .ok_or(PinError::AlreadyTaken)
    }
}

/// The ADC-capable pins, handed out as ADC channels
pub struct AnalogBank {
    pin26: Option<Peri<'static, PIN_26>>,
    pin27: Option<Peri<'static, PIN_27>>,
    pin28: Option<Peri<'static, PIN_28>>,
    pin29: Option<Peri<'static, PIN_29>>,
}

impl AnalogBank {
    /// Take the ADC channel of GPIO `pin_num`, pull resistors disabled
    pub fn take(&mut self, pin_num: u8) -> Result<Channel<'static>, PinError> {
        let channel = match pin_num {
            26 => self.pin26.take().map(|p| Channel::new_pin(p, Pull::None)),
            27 => self.pin27.take().map(|p| Channel::new_pin(p, Pull::None)),
            28 => self.pin28.take().map(|p| Channel::new_pin(p, Pull::None)),
            29 => self.pin29.take().map(|p| Channel::new_pin(p, Pull::None)),
            n if n >= GPIO_COUNT => return Err(PinError::InvalidPin),
            _ => return Err(PinError::NotAnalog),
        };
        channel.ok_or(PinError::AlreadyTaken)
    }
}

/// Peripherals with a fixed role on every board
pub struct FixedPeripherals {
    pub i2c0: Peri<'static, I2C0>,
    pub sda: Peri<'static, PIN_20>,
    pub scl: Peri<'static, PIN_21>,
    pub uart0: Peri<'static, UART0>,
    pub tx: Peri<'static, PIN_0>,
    pub rx: Peri<'static, PIN_1>,
    pub adc: Peri<'static, ADC>,
}

/// Split the peripherals into the pin bank, the analog bank, and the
/// fixed-function peripherals
pub fn split(p: Peripherals) -> (PinBank, AnalogBank, FixedPeripherals) {
    let bank = PinBank {
        pins: [
            None, // UART0 TX
            None, // UART0 RX
            Some(p.PIN_2.into()),
            Some(p.PIN_3.into()),
            Some(p.PIN_4.into()),
            Some(p.PIN_5.into()),
            Some(p.PIN_6.into()),
            Some(p.PIN_7.into()),
            Some(p.PIN_8.into()),
            Some(p.PIN_9.into()),
            Some(p.PIN_10.into()),
            Some(p.PIN_11.into()),
            Some(p.PIN_12.into()),
            Some(p.PIN_13.into()),
            Some(p.PIN_14.into()),
            Some(p.PIN_15.into()),
            Some(p.PIN_16.into()),
            Some(p.PIN_17.into()),
            Some(p.PIN_18.into()),
            Some(p.PIN_19.into()),
            None, // I2C0 SDA
            None, // I2C0 SCL
            Some(p.PIN_22.into()),
            Some(p.PIN_23.into()),
            Some(p.PIN_24.into()),
            Some(p.PIN_25.into()),
            None, // ADC0..ADC3 live in the analog bank
            None,
            None,
            None,
        ],
    };

    let analog = AnalogBank {
        pin26: Some(p.PIN_26),
        pin27: Some(p.PIN_27),
        pin28: Some(p.PIN_28),
        pin29: Some(p.PIN_29),
    };

    let fixed = FixedPeripherals {
        i2c0: p.I2C0,
        sda: p.PIN_20,
        scl: p.PIN_21,
        uart0: p.UART0,
        tx: p.PIN_0,
        rx: p.PIN_1,
        adc: p.ADC,
    };

    (bank, analog, fixed)
}
