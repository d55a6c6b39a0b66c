//! Analog input abstraction
//!
//! All analog readings are normalised to a 10-bit scale (0..=1023) so that
//! thresholds in the board configuration do not depend on the converter
//! resolution of a particular chip. A 12-bit converter shifts right by two.

/// Analog conversion failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogError {
    /// The converter did not produce a sample
    Conversion,
}

/// Single analog channel
pub trait AnalogInput {
    /// Take one sample, normalised to `0..=1023`
    ///
    /// Takes `&mut self` because ADC reads typically require mutable access.
    fn read(&mut self) -> Result<u16, AnalogError>;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    fn read(&mut self) -> Result<u16, AnalogError> {
        (**self).read()
    }
}
