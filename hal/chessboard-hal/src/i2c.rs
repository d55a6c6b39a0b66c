//! I2C bus abstractions
//!
//! Master-side operations used by the controller that polls a board.
//! The board itself is a bus *target*; that side is driven by the chip
//! HAL's target peripheral and never goes through this trait.

/// I2C bus master
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write then read in a single transaction (repeated start)
    ///
    /// The register file protocol uses this to set the pointer and fetch
    /// the byte it addresses.
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        (**self).write_read(address, write_data, read_buf)
    }
}
