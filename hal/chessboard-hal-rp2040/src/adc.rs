//! ADC implementation of the chessboard-hal analog trait
//!
//! RP2040 has one 12-bit ADC shared by GPIO26-29. Every [`AdcInput`] holds
//! a reference to the same converter and its own channel. Samples are
//! shifted down to the 10-bit scale the samplers' thresholds use.

use core::cell::RefCell;

use chessboard_hal::{AnalogError, AnalogInput};
use embassy_rp::adc::{Adc, Blocking, Channel};

/// Converter shared by all analog inputs
pub type SharedAdc = RefCell<Adc<'static, Blocking>>;

/// One ADC channel
pub struct AdcInput {
    adc: &'static SharedAdc,
    channel: Channel<'static>,
}

impl AdcInput {
    pub fn new(adc: &'static SharedAdc, channel: Channel<'static>) -> Self {
        Self { adc, channel }
    }
}

impl AnalogInput for AdcInput {
    fn read(&mut self) -> Result<u16, AnalogError> {
        let mut adc = self
            .adc
            .try_borrow_mut()
            .map_err(|_| AnalogError::Conversion)?;
        adc.blocking_read(&mut self.channel)
            .map(|sample| sample >> 2)
            .map_err(|_| AnalogError::Conversion)
    }
}
