//! GPIO implementations of the chessboard-hal pin traits
//!
//! Inversion from the board configuration is applied here, so drivers only
//! ever see logical levels.

use chessboard_core::config::PinConfig;
use chessboard_hal::{InputPin, OutputPin};
use embassy_rp::gpio::{AnyPin, Input, Level, Output, OutputOpenDrain, Pull};
use embassy_rp::Peri;

/// Push-pull output, logically low at creation
pub struct GpioOutput {
    pin: Output<'static>,
    inverted: bool,
}

impl GpioOutput {
    pub fn new(pin: Peri<'static, AnyPin>, config: PinConfig) -> Self {
        let idle = if config.inverted { Level::High } else { Level::Low };
        Self {
            pin: Output::new(pin, idle),
            inverted: config.inverted,
        }
    }
}

impl OutputPin for GpioOutput {
    fn set_high(&mut self) {
        if self.inverted {
            self.pin.set_low();
        } else {
            self.pin.set_high();
        }
    }

    fn set_low(&mut self) {
        if self.inverted {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}

/// Digital input with optional pull-up
pub struct GpioInput {
    pin: Input<'static>,
    inverted: bool,
}

impl GpioInput {
    pub fn new(pin: Peri<'static, AnyPin>, config: PinConfig) -> Self {
        let pull = if config.pull_up { Pull::Up } else { Pull::None };
        Self {
            pin: Input::new(pin, pull),
            inverted: config.inverted,
        }
    }
}

impl InputPin for GpioInput {
    fn is_high(&self) -> bool {
        self.pin.is_high() != self.inverted
    }
}

/// Open-drain line for matrix row selects, released at creation
///
/// `set_low` pulls the line down, `set_high` lets it float up.
pub struct OpenDrain {
    pin: OutputOpenDrain<'static>,
}

impl OpenDrain {
    pub fn new(pin: Peri<'static, AnyPin>) -> Self {
        Self {
            pin: OutputOpenDrain::new(pin, Level::High),
        }
    }
}

impl OutputPin for OpenDrain {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }
}
