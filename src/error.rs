//! Error definitions for MAX17048 driver.

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug)]
pub enum Error<I2cError> {
    /// Underlying I2C transaction failed.
    I2c(I2cError),
    /// VERSION read back as 0x0000 or 0xFFFF: no device answering, or the bus is stuck.
    NotDetected,
    /// Provided parameter was outside datasheet limits.
    OutOfRange,
}

impl<I2cError: core::fmt::Debug> core::fmt::Display for Error<I2cError> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "I2C error: {:?}", e),
            Error::NotDetected => write!(f, "MAX17048 not detected"),
            Error::OutOfRange => write!(f, "parameter out of range"),
        }
    }
}
