//! Driver for MAX17048.
//! Blocking I2C API; the async version mirrors it behind the `async` feature.
//!
//! Register byte order on writes differs per register and is kept as-is:
//! COMMAND and MODE go out MSB first, VALRT and CONFIG go out LSB first.

use crate::data_types::{AlertStatus, VoltageAlertLimits};
use crate::error::Error;
use crate::registers::{
    addr, alert_code_to_volts, alert_volts_in_range, alert_volts_to_code, crate_to_percent_per_hour,
    pack_valrt, soc_to_percent, vcell_to_volts, ConfigBits, ModeBits, StatusBits, CMD_RESET,
    DEFAULT_I2C_ADDRESS, QUICK_START_DELAY_MS, RESET_DELAY_MS,
};

/// MAX17048 fuel gauge.
pub struct Max17048<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> Max17048<I2C> {
    /// Create a new driver instance with the default I2C address (0x36).
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: DEFAULT_I2C_ADDRESS,
        }
    }

    /// Create a new driver instance with a custom I2C address.
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Return the 7-bit I2C address configured for this instance.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the bus.
    pub fn free(self) -> I2C {
        self.i2c
    }
}

fn check_version<E>(version: u16) -> Result<(), Error<E>> {
    if version == 0x0000 || version == 0xFFFF {
        warn!("MAX17048 not detected (VERSION={=u16:#x})", version);
        return Err(Error::NotDetected);
    }
    debug!("MAX17048 detected, VERSION={=u16:#x}", version);
    Ok(())
}

/// Validate both thresholds and return the VALRT word.
fn encode_limits<E>(min_volts: f32, max_volts: f32) -> Result<u16, Error<E>> {
    if !alert_volts_in_range(min_volts) || !alert_volts_in_range(max_volts) {
        return Err(Error::OutOfRange);
    }
    if min_volts > max_volts {
        warn!("VALRT window inverted: min {=f32} V > max {=f32} V", min_volts, max_volts);
    }
    Ok(pack_valrt(alert_volts_to_code(min_volts), alert_volts_to_code(max_volts)))
}

fn clear_alert_bit(raw: u16) -> u16 {
    let mut config = ConfigBits::from_bits_retain(raw);
    config.remove(ConfigBits::ALRT);
    config.bits()
}

impl<I2C> Max17048<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Probe the device by reading VERSION.
    ///
    /// Fails with [`Error::NotDetected`] when the register reads as all zeros or all ones.
    pub fn init(&mut self) -> Result<(), Error<I2C::Error>> {
        let version = self.version()?;
        check_version(version)
    }

    /// Read the raw VERSION register.
    pub fn version(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_reg16(addr::VERSION)
    }

    /// Read a 16-bit register (MSB first on the wire).
    pub fn read_reg16(&mut self, reg: u8) -> Result<u16, Error<I2C::Error>> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(Error::I2c)?;
        trace!("read {=u8:#x} -> {=u16:#x}", reg, u16::from_be_bytes(buf));
        Ok(u16::from_be_bytes(buf))
    }

    /// Read two bytes starting at `reg` and return only the first one.
    ///
    /// Starting at an odd address returns the low byte of the even register thanks to
    /// the device's address auto-increment.
    pub fn read_reg_msb(&mut self, reg: u8) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(Error::I2c)?;
        Ok(buf[0])
    }

    /// Write a 16-bit register, MSB first.
    pub fn write_reg16(&mut self, reg: u8, value: u16) -> Result<(), Error<I2C::Error>> {
        let [msb, lsb] = value.to_be_bytes();
        self.i2c
            .write(self.address, &[reg, msb, lsb])
            .map_err(Error::I2c)
    }

    /// Write a 16-bit register, LSB first.
    pub fn write_reg16_le(&mut self, reg: u8, value: u16) -> Result<(), Error<I2C::Error>> {
        let [lsb, msb] = value.to_le_bytes();
        self.i2c
            .write(self.address, &[reg, lsb, msb])
            .map_err(Error::I2c)
    }

    /// Cell voltage in volts.
    pub fn cell_voltage(&mut self) -> Result<f32, Error<I2C::Error>> {
        let raw = self.read_reg16(addr::VCELL)?;
        Ok(vcell_to_volts(raw))
    }

    /// State of charge in percent.
    pub fn cell_percent(&mut self) -> Result<f32, Error<I2C::Error>> {
        let raw = self.read_reg16(addr::SOC)?;
        Ok(soc_to_percent(raw))
    }

    /// Charge rate in %/h. Positive while charging, negative while discharging.
    pub fn charge_rate(&mut self) -> Result<f32, Error<I2C::Error>> {
        let raw = self.read_reg16(addr::CRATE)?;
        Ok(crate_to_percent_per_hour(raw))
    }

    /// Issue a power-on reset and wait for the device to come back.
    pub fn reset<D>(&mut self, delay: &mut D) -> Result<(), Error<I2C::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        debug!("MAX17048 reset");
        self.write_reg16(addr::COMMAND, CMD_RESET)?;
        delay.delay_ms(RESET_DELAY_MS);
        Ok(())
    }

    /// Restart the SOC estimate from the present cell voltage.
    pub fn quick_start<D>(&mut self, delay: &mut D) -> Result<(), Error<I2C::Error>>
    where
        D: embedded_hal::delay::DelayNs,
    {
        debug!("MAX17048 quick-start");
        self.write_reg16(addr::MODE, ModeBits::QUICK_START.bits())?;
        delay.delay_ms(QUICK_START_DELAY_MS);
        Ok(())
    }

    /// Program the voltage alert window. Both bounds must lie in 0..=5.08 V.
    ///
    /// Codes are truncated in `f32`, so limits read back from
    /// [`voltage_alert_limits`](Self::voltage_alert_limits) can encode one 20 mV step lower when written again.
    pub fn set_voltage_limits(&mut self, min_volts: f32, max_volts: f32) -> Result<(), Error<I2C::Error>> {
        let valrt = encode_limits(min_volts, max_volts)?;
        debug!("VALRT <- {=u16:#x}", valrt);
        self.write_reg16_le(addr::VALRT, valrt)
    }

    /// Upper alert threshold in volts.
    pub fn max_alert_voltage(&mut self) -> Result<f32, Error<I2C::Error>> {
        let code = self.read_reg_msb(addr::VALRT + 1)?;
        Ok(alert_code_to_volts(code))
    }

    /// Lower alert threshold in volts.
    pub fn min_alert_voltage(&mut self) -> Result<f32, Error<I2C::Error>> {
        let code = self.read_reg_msb(addr::VALRT)?;
        Ok(alert_code_to_volts(code))
    }

    /// Read both alert thresholds.
    pub fn voltage_alert_limits(&mut self) -> Result<VoltageAlertLimits, Error<I2C::Error>> {
        let min_volts = self.min_alert_voltage()?;
        let max_volts = self.max_alert_voltage()?;
        Ok(VoltageAlertLimits { min_volts, max_volts })
    }

    /// Read STATUS alert bits.
    pub fn status(&mut self) -> Result<StatusBits, Error<I2C::Error>> {
        let val = self.read_reg_msb(addr::STATUS)?;
        Ok(StatusBits::from_bits_truncate(val))
    }

    /// Decode STATUS into individual alert flags.
    pub fn alert_status(&mut self) -> Result<AlertStatus, Error<I2C::Error>> {
        Ok(self.status()?.into())
    }

    /// Cell voltage has risen above the upper threshold.
    pub fn alert_high_voltage(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.status()?.contains(StatusBits::VH))
    }

    /// Cell voltage has fallen below the lower threshold.
    pub fn alert_low_voltage(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.status()?.contains(StatusBits::VL))
    }

    /// Clear the ALRT latch (CONFIG bit 5), releasing the ALRT pin.
    pub fn clear_alert_latch(&mut self) -> Result<(), Error<I2C::Error>> {
        let cur = self.read_reg16(addr::CONFIG)?;
        let new = clear_alert_bit(cur);
        debug!("CONFIG {=u16:#x} -> {=u16:#x}", cur, new);
        self.write_reg16_le(addr::CONFIG, new)
    }
}

#[cfg(feature = "async")]
impl<I2C> Max17048<I2C>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    /// Async version of [`init`](Self::init).
    pub async fn init_async(&mut self) -> Result<(), Error<I2C::Error>> {
        let version = self.version_async().await?;
        check_version(version)
    }

    pub async fn version_async(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_reg16_async(addr::VERSION).await
    }

    pub async fn read_reg16_async(&mut self, reg: u8) -> Result<u16, Error<I2C::Error>> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .await
            .map_err(Error::I2c)?;
        trace!("read {=u8:#x} -> {=u16:#x}", reg, u16::from_be_bytes(buf));
        Ok(u16::from_be_bytes(buf))
    }

    pub async fn read_reg_msb_async(&mut self, reg: u8) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .await
            .map_err(Error::I2c)?;
        Ok(buf[0])
    }

    pub async fn write_reg16_async(&mut self, reg: u8, value: u16) -> Result<(), Error<I2C::Error>> {
        let [msb, lsb] = value.to_be_bytes();
        self.i2c
            .write(self.address, &[reg, msb, lsb])
            .await
            .map_err(Error::I2c)
    }

    pub async fn write_reg16_le_async(&mut self, reg: u8, value: u16) -> Result<(), Error<I2C::Error>> {
        let [lsb, msb] = value.to_le_bytes();
        self.i2c
            .write(self.address, &[reg, lsb, msb])
            .await
            .map_err(Error::I2c)
    }

    pub async fn cell_voltage_async(&mut self) -> Result<f32, Error<I2C::Error>> {
        let raw = self.read_reg16_async(addr::VCELL).await?;
        Ok(vcell_to_volts(raw))
    }

    pub async fn cell_percent_async(&mut self) -> Result<f32, Error<I2C::Error>> {
        let raw = self.read_reg16_async(addr::SOC).await?;
        Ok(soc_to_percent(raw))
    }

    pub async fn charge_rate_async(&mut self) -> Result<f32, Error<I2C::Error>> {
        let raw = self.read_reg16_async(addr::CRATE).await?;
        Ok(crate_to_percent_per_hour(raw))
    }

    pub async fn reset_async<D>(&mut self, delay: &mut D) -> Result<(), Error<I2C::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        debug!("MAX17048 reset");
        self.write_reg16_async(addr::COMMAND, CMD_RESET).await?;
        delay.delay_ms(RESET_DELAY_MS).await;
        Ok(())
    }

    pub async fn quick_start_async<D>(&mut self, delay: &mut D) -> Result<(), Error<I2C::Error>>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        debug!("MAX17048 quick-start");
        self.write_reg16_async(addr::MODE, ModeBits::QUICK_START.bits()).await?;
        delay.delay_ms(QUICK_START_DELAY_MS).await;
        Ok(())
    }

    pub async fn set_voltage_limits_async(&mut self, min_volts: f32, max_volts: f32) -> Result<(), Error<I2C::Error>> {
        let valrt = encode_limits(min_volts, max_volts)?;
        debug!("VALRT <- {=u16:#x}", valrt);
        self.write_reg16_le_async(addr::VALRT, valrt).await
    }

    pub async fn max_alert_voltage_async(&mut self) -> Result<f32, Error<I2C::Error>> {
        let code = self.read_reg_msb_async(addr::VALRT + 1).await?;
        Ok(alert_code_to_volts(code))
    }

    pub async fn min_alert_voltage_async(&mut self) -> Result<f32, Error<I2C::Error>> {
        let code = self.read_reg_msb_async(addr::VALRT).await?;
        Ok(alert_code_to_volts(code))
    }

    pub async fn voltage_alert_limits_async(&mut self) -> Result<VoltageAlertLimits, Error<I2C::Error>> {
        let min_volts = self.min_alert_voltage_async().await?;
        let max_volts = self.max_alert_voltage_async().await?;
        Ok(VoltageAlertLimits { min_volts, max_volts })
    }

    pub async fn status_async(&mut self) -> Result<StatusBits, Error<I2C::Error>> {
        let val = self.read_reg_msb_async(addr::STATUS).await?;
        Ok(StatusBits::from_bits_truncate(val))
    }

    pub async fn alert_status_async(&mut self) -> Result<AlertStatus, Error<I2C::Error>> {
        Ok(self.status_async().await?.into())
    }

    pub async fn alert_high_voltage_async(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.status_async().await?.contains(StatusBits::VH))
    }

    pub async fn alert_low_voltage_async(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.status_async().await?.contains(StatusBits::VL))
    }

    pub async fn clear_alert_latch_async(&mut self) -> Result<(), Error<I2C::Error>> {
        let cur = self.read_reg16_async(addr::CONFIG).await?;
        let new = clear_alert_bit(cur);
        debug!("CONFIG {=u16:#x} -> {=u16:#x}", cur, new);
        self.write_reg16_le_async(addr::CONFIG, new).await
    }
}
