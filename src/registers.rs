//! Register map and constants for MAX17048.
//! Values and scales are taken from the datasheet register summary.

/// Fixed 7-bit I2C address of the MAX17048.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x36;

/// Register addresses. Every register is 16 bits wide, MSB at the even address.
pub mod addr {
    /// Cell voltage (78.125 µV LSB).
    pub const VCELL: u8 = 0x02;
    /// State of charge (1/256 % LSB).
    pub const SOC: u8 = 0x04;
    /// Mode (quick-start, sleep enable, hibernate status).
    pub const MODE: u8 = 0x06;
    /// IC production version.
    pub const VERSION: u8 = 0x08;
    /// Hibernate thresholds.
    pub const HIBRT: u8 = 0x0A;
    /// RCOMP (MSB) and alert configuration (LSB).
    pub const CONFIG: u8 = 0x0C;
    /// Voltage alert window: VALRT.MIN at 0x14, VALRT.MAX at 0x15 (20 mV LSB).
    pub const VALRT: u8 = 0x14;
    /// Charge rate, signed (0.208 %/h LSB).
    pub const CRATE: u8 = 0x16;
    /// Alert flags live in the MSB.
    pub const STATUS: u8 = 0x1A;
    /// Command register (power-on reset).
    pub const COMMAND: u8 = 0xFE;
}

/// Word written to COMMAND to force a power-on reset.
pub const CMD_RESET: u16 = 0x5400;
/// Time the gauge needs to come back after [`CMD_RESET`].
pub const RESET_DELAY_MS: u32 = 10;
/// Time the gauge needs to restart its SOC estimate after a quick-start.
pub const QUICK_START_DELAY_MS: u32 = 2;

/// VCELL resolution in microvolts.
pub const VCELL_LSB_UV: f32 = 78.125;
/// SOC register counts per percent.
pub const SOC_COUNTS_PER_PERCENT: f32 = 256.0;
/// CRATE resolution in %/h.
pub const CRATE_LSB_PCT_PER_HOUR: f32 = 0.208;

/// VALRT threshold resolution.
pub const VALRT_LSB_V: f32 = 0.02;
/// Lowest encodable alert threshold.
pub const VALRT_MIN_V: f32 = 0.0;
/// Highest alert threshold accepted by the driver (code 254).
pub const VALRT_MAX_V: f32 = 5.08;

bitflags::bitflags! {
    /// MODE register bits (0x06).
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct ModeBits: u16 {
        /// Bit 14: Restart fuel-gauge calculations from the present cell voltage.
        const QUICK_START = 1 << 14;
        /// Bit 13: Allow entering sleep mode via CONFIG.SLEEP.
        const EN_SLEEP    = 1 << 13;
        /// Bit 12: Read-only, set while the gauge is hibernating.
        const HIB_STAT    = 1 << 12;
    }

    /// CONFIG register bits (0x0C). The MSB holds RCOMP; use `from_bits_retain` to keep it.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct ConfigBits: u16 {
        /// Bit 7: Force sleep (requires MODE.EN_SLEEP).
        const SLEEP = 1 << 7;
        /// Bit 6: Alert on every 1% SOC change.
        const ALSC  = 1 << 6;
        /// Bit 5: Alert latch, drives the ALRT pin. Write 0 to clear.
        const ALRT  = 1 << 5;
        // Bits 4-0: ATHD empty-alert threshold.
        const ATHD0 = 1 << 0;
        const ATHD1 = 1 << 1;
        const ATHD2 = 1 << 2;
        const ATHD3 = 1 << 3;
        const ATHD4 = 1 << 4;
    }

    /// STATUS register alert bits (0x1A, MSB only).
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct StatusBits: u8 {
        /// Reset indicator, set after power-up until cleared.
        const RI   = 1 << 0;
        /// VCELL rose above VALRT.MAX.
        const VH   = 1 << 1;
        /// VCELL fell below VALRT.MIN.
        const VL   = 1 << 2;
        /// Voltage reset detected.
        const VR   = 1 << 3;
        /// SOC crossed the CONFIG.ATHD threshold.
        const HD   = 1 << 4;
        /// SOC changed by at least 1% (when CONFIG.ALSC is set).
        const SC   = 1 << 5;
        /// Enable voltage-reset alert.
        const ENVR = 1 << 6;
    }
}

/// Convert a raw VCELL reading to volts.
pub fn vcell_to_volts(raw: u16) -> f32 {
    raw as f32 * VCELL_LSB_UV / 1_000_000.0
}

/// Convert a raw SOC reading to percent. Can exceed 100 on a freshly charged cell.
pub fn soc_to_percent(raw: u16) -> f32 {
    raw as f32 / SOC_COUNTS_PER_PERCENT
}

/// Convert a raw CRATE reading to %/h. The register is two's complement; negative means discharging.
pub fn crate_to_percent_per_hour(raw: u16) -> f32 {
    (raw as i16) as f32 * CRATE_LSB_PCT_PER_HOUR
}

/// Whether `volts` can be encoded into a VALRT byte.
pub fn alert_volts_in_range(volts: f32) -> bool {
    volts.is_finite() && (VALRT_MIN_V..=VALRT_MAX_V).contains(&volts)
}

/// Convert an alert threshold to its 20 mV code, truncating. Clamps to datasheet limits.
pub fn alert_volts_to_code(volts: f32) -> u8 {
    // NaN passes through clamp and casts to 0.
    let volts = volts.clamp(VALRT_MIN_V, VALRT_MAX_V);
    (volts / VALRT_LSB_V) as u8
}

/// Convert a VALRT code back to volts.
pub fn alert_code_to_volts(code: u8) -> f32 {
    code as f32 * VALRT_LSB_V
}

/// Pack min/max codes into the VALRT word as seen by the driver: max in the high byte.
pub fn pack_valrt(min_code: u8, max_code: u8) -> u16 {
    ((max_code as u16) << 8) | min_code as u16
}
