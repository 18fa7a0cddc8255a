use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};
use max17048_rs::{Error, Max17048};

const ADDR: u8 = 0x36;

#[derive(Default)]
struct RecordingDelay {
    ms: Vec<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.ms.push(ms);
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-5
}

#[test]
fn init_accepts_real_version() {
    let expectations = [I2cTrans::write_read(ADDR, vec![0x08], vec![0x00, 0x12])];
    let mut driver = Max17048::new(I2cMock::new(&expectations));
    assert!(driver.init().is_ok());
    driver.free().done();
}

#[test]
fn init_rejects_all_zero_and_all_one() {
    for raw in [[0x00, 0x00], [0xFF, 0xFF]] {
        let expectations = [I2cTrans::write_read(ADDR, vec![0x08], raw.to_vec())];
        let mut driver = Max17048::new(I2cMock::new(&expectations));
        assert!(matches!(driver.init(), Err(Error::NotDetected)));
        driver.free().done();
    }
}

#[test]
fn init_reports_bus_error() {
    let expectations = [I2cTrans::write_read(ADDR, vec![0x08], vec![0x00, 0x00]).with_error(ErrorKind::Other)];
    let mut driver = Max17048::new(I2cMock::new(&expectations));
    assert!(matches!(driver.init(), Err(Error::I2c(ErrorKind::Other))));
    driver.free().done();
}

#[test]
fn custom_address_is_used() {
    let expectations = [I2cTrans::write_read(0x37, vec![0x02], vec![0x00, 0x00])];
    let mut driver = Max17048::with_address(I2cMock::new(&expectations), 0x37);
    assert_eq!(driver.address(), 0x37);
    assert_eq!(driver.cell_voltage().unwrap(), 0.0);
    driver.free().done();
}

#[test]
fn telemetry_reads_big_endian() {
    let expectations = [
        // 0xB900 * 78.125 uV = 3.7 V
        I2cTrans::write_read(ADDR, vec![0x02], vec![0xB9, 0x00]),
        I2cTrans::write_read(ADDR, vec![0x04], vec![0x01, 0x00]),
        I2cTrans::write_read(ADDR, vec![0x16], vec![0xFF, 0xFF]),
        I2cTrans::write_read(ADDR, vec![0x16], vec![0x00, 0x01]),
    ];
    let mut driver = Max17048::new(I2cMock::new(&expectations));
    assert!(approx(driver.cell_voltage().unwrap(), 3.7));
    assert_eq!(driver.cell_percent().unwrap(), 1.0);
    assert!(approx(driver.charge_rate().unwrap(), -0.208));
    assert!(approx(driver.charge_rate().unwrap(), 0.208));
    driver.free().done();
}

#[test]
fn reset_writes_command_then_waits() {
    let expectations = [I2cTrans::write(ADDR, vec![0xFE, 0x54, 0x00])];
    let mut driver = Max17048::new(I2cMock::new(&expectations));
    let mut delay = RecordingDelay::default();
    driver.reset(&mut delay).unwrap();
    assert_eq!(delay.ms, vec![10]);
    driver.free().done();
}

#[test]
fn quick_start_writes_mode_then_waits() {
    let expectations = [I2cTrans::write(ADDR, vec![0x06, 0x40, 0x00])];
    let mut driver = Max17048::new(I2cMock::new(&expectations));
    let mut delay = RecordingDelay::default();
    driver.quick_start(&mut delay).unwrap();
    assert_eq!(delay.ms, vec![2]);
    driver.free().done();
}

#[test]
fn reset_skips_wait_on_bus_error() {
    let expectations = [I2cTrans::write(ADDR, vec![0xFE, 0x54, 0x00]).with_error(ErrorKind::Other)];
    let mut driver = Max17048::new(I2cMock::new(&expectations));
    let mut delay = RecordingDelay::default();
    assert!(driver.reset(&mut delay).is_err());
    assert!(delay.ms.is_empty());
    driver.free().done();
}

#[test]
fn set_voltage_limits_writes_lsb_first() {
    // min 3.0 V -> 0x96, max 4.2 V -> 0xD2, VALRT word 0xD296
    let expectations = [I2cTrans::write(ADDR, vec![0x14, 0x96, 0xD2])];
    let mut driver = Max17048::new(I2cMock::new(&expectations));
    driver.set_voltage_limits(3.0, 4.2).unwrap();
    driver.free().done();
}

#[test]
fn set_voltage_limits_rejects_out_of_range_without_bus_traffic() {
    let expectations: [I2cTrans; 0] = [];
    let mut driver = Max17048::new(I2cMock::new(&expectations));
    assert!(matches!(driver.set_voltage_limits(-0.1, 4.2), Err(Error::OutOfRange)));
    assert!(matches!(driver.set_voltage_limits(3.0, 5.2), Err(Error::OutOfRange)));
    assert!(matches!(driver.set_voltage_limits(f32::NAN, 4.2), Err(Error::OutOfRange)));
    driver.free().done();
}

#[test]
fn alert_thresholds_read_first_byte_of_each_pair() {
    let expectations = [
        I2cTrans::write_read(ADDR, vec![0x15], vec![0xD2, 0x00]),
        I2cTrans::write_read(ADDR, vec![0x14], vec![0x96, 0xD2]),
        I2cTrans::write_read(ADDR, vec![0x14], vec![0x96, 0xD2]),
        I2cTrans::write_read(ADDR, vec![0x15], vec![0xD2, 0x00]),
    ];
    let mut driver = Max17048::new(I2cMock::new(&expectations));
    assert!(approx(driver.max_alert_voltage().unwrap(), 4.2));
    assert!(approx(driver.min_alert_voltage().unwrap(), 3.0));
    let limits = driver.voltage_alert_limits().unwrap();
    assert!(approx(limits.min_volts, 3.0));
    assert!(approx(limits.max_volts, 4.2));
    driver.free().done();
}

#[test]
fn alert_flags_use_status_msb() {
    let expectations = [
        I2cTrans::write_read(ADDR, vec![0x1A], vec![0x06, 0xFF]),
        I2cTrans::write_read(ADDR, vec![0x1A], vec![0x06, 0xFF]),
        I2cTrans::write_read(ADDR, vec![0x1A], vec![0x00, 0xFF]),
        I2cTrans::write_read(ADDR, vec![0x1A], vec![0x00, 0xFF]),
        I2cTrans::write_read(ADDR, vec![0x1A], vec![0x02, 0x00]),
        I2cTrans::write_read(ADDR, vec![0x1A], vec![0x02, 0x00]),
    ];
    let mut driver = Max17048::new(I2cMock::new(&expectations));
    assert!(driver.alert_high_voltage().unwrap());
    assert!(driver.alert_low_voltage().unwrap());
    assert!(!driver.alert_high_voltage().unwrap());
    assert!(!driver.alert_low_voltage().unwrap());
    assert!(driver.alert_high_voltage().unwrap());
    assert!(!driver.alert_low_voltage().unwrap());
    driver.free().done();
}

#[test]
fn alert_status_decodes_all_flags() {
    let expectations = [I2cTrans::write_read(ADDR, vec![0x1A], vec![0x05, 0x00])];
    let mut driver = Max17048::new(I2cMock::new(&expectations));
    let status = driver.alert_status().unwrap();
    assert!(status.reset_indicator);
    assert!(status.voltage_low);
    assert!(!status.voltage_high);
    driver.free().done();
}

#[test]
fn clear_alert_latch_clears_bit5_and_writes_lsb_first() {
    let expectations = [
        I2cTrans::write_read(ADDR, vec![0x0C], vec![0x00, 0xFF]),
        I2cTrans::write(ADDR, vec![0x0C, 0xDF, 0x00]),
    ];
    let mut driver = Max17048::new(I2cMock::new(&expectations));
    driver.clear_alert_latch().unwrap();
    driver.free().done();
}

#[test]
fn clear_alert_latch_keeps_rcomp() {
    let expectations = [
        I2cTrans::write_read(ADDR, vec![0x0C], vec![0x97, 0x3C]),
        I2cTrans::write(ADDR, vec![0x0C, 0x1C, 0x97]),
    ];
    let mut driver = Max17048::new(I2cMock::new(&expectations));
    driver.clear_alert_latch().unwrap();
    driver.free().done();
}
