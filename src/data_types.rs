//! Data types for MAX17048 driver.

use crate::registers::StatusBits;

/// Alert flags decoded from STATUS.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AlertStatus {
    /// Device has been reset and not yet configured.
    pub reset_indicator: bool,
    /// Cell voltage above VALRT.MAX.
    pub voltage_high: bool,
    /// Cell voltage below VALRT.MIN.
    pub voltage_low: bool,
    /// Voltage reset event.
    pub voltage_reset: bool,
    /// SOC below the empty-alert threshold.
    pub soc_low: bool,
    /// SOC changed by 1%.
    pub soc_change: bool,
}

impl From<StatusBits> for AlertStatus {
    fn from(bits: StatusBits) -> Self {
        Self {
            reset_indicator: bits.contains(StatusBits::RI),
            voltage_high: bits.contains(StatusBits::VH),
            voltage_low: bits.contains(StatusBits::VL),
            voltage_reset: bits.contains(StatusBits::VR),
            soc_low: bits.contains(StatusBits::HD),
            soc_change: bits.contains(StatusBits::SC),
        }
    }
}

/// Voltage alert window as programmed in VALRT (20 mV resolution).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoltageAlertLimits {
    pub min_volts: f32,
    pub max_volts: f32,
}
