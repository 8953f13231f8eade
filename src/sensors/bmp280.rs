//! Bosch BMP280 barometric pressure / temperature sensor.
//!
//! Register-level driver over any `embedded_hal::i2c::I2c` bus.  The bus is
//! passed into every call so the BMP280 and AHT20 can share one controller.
//! Compensation uses the datasheet's fixed-point algorithm (§3.11.3): 32-bit
//! for temperature, 64-bit for pressure.

use embedded_hal::i2c::I2c;

use crate::error::SensorError;

pub const DEFAULT_ADDRESS: u8 = 0x76;

const REG_CALIB_00: u8 = 0x88;
const REG_CHIP_ID: u8 = 0xD0;
const REG_CTRL_MEAS: u8 = 0xF4;
const REG_CONFIG: u8 = 0xF5;
const REG_PRESS_MSB: u8 = 0xF7;

const CHIP_ID: u8 = 0x58;
/// osrs_t = ×1, osrs_p = ×4, normal mode.
const CTRL_MEAS_NORMAL: u8 = 0b001_011_11;
/// t_standby = 62.5 ms, IIR filter ×4.
const CONFIG_FILTERED: u8 = 0b001_010_00;

/// Factory trimming parameters (`dig_T1..3`, `dig_P1..9`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    pub t1: u16,
    pub t2: i16,
    pub t3: i16,
    pub p1: u16,
    pub p2: i16,
    pub p3: i16,
    pub p4: i16,
    pub p5: i16,
    pub p6: i16,
    pub p7: i16,
    pub p8: i16,
    pub p9: i16,
}

impl Calibration {
    /// Decode the 24-byte little-endian block at 0x88.
    pub fn from_bytes(b: &[u8; 24]) -> Self {
        let u = |i: usize| u16::from_le_bytes([b[i], b[i + 1]]);
        let s = |i: usize| i16::from_le_bytes([b[i], b[i + 1]]);
        Self {
            t1: u(0),
            t2: s(2),
            t3: s(4),
            p1: u(6),
            p2: s(8),
            p3: s(10),
            p4: s(12),
            p5: s(14),
            p6: s(16),
            p7: s(18),
            p8: s(20),
            p9: s(22),
        }
    }

    /// Returns `(temperature in 0.01 °C, t_fine)`, or `None` when corrupt
    /// trimming data pushes `t_fine` out of range.
    pub fn compensate_temperature(&self, adc_t: i32) -> Option<(i32, i32)> {
        let adc_t = i64::from(adc_t);
        let t1 = i64::from(self.t1);
        let var1 = (((adc_t >> 3) - (t1 << 1)) * i64::from(self.t2)) >> 11;
        let delta = (adc_t >> 4) - t1;
        let var2 = (((delta * delta) >> 12) * i64::from(self.t3)) >> 14;
        let t_fine = i32::try_from(var1 + var2).ok()?;
        let centi_c = i32::try_from((i64::from(t_fine) * 5 + 128) >> 8).ok()?;
        Some((centi_c, t_fine))
    }

    /// Pressure in whole pascals, or `None` when the trimming data would
    /// divide by zero or overflow.
    pub fn compensate_pressure(&self, adc_p: i32, t_fine: i32) -> Option<i32> {
        let var1 = i64::from(t_fine) - 128_000;
        let var2 = var1
            .checked_mul(var1)?
            .checked_mul(i64::from(self.p6))?
            .checked_add(var1.checked_mul(i64::from(self.p5))?.checked_mul(1 << 17)?)?
            .checked_add(i64::from(self.p4) << 35)?;
        let var1 = (var1.checked_mul(var1)?.checked_mul(i64::from(self.p3))? >> 8)
            .checked_add(var1.checked_mul(i64::from(self.p2))?.checked_mul(1 << 12)?)?;
        let var1 = (1_i64 << 47).checked_add(var1)?.checked_mul(i64::from(self.p1))? >> 33;
        if var1 == 0 {
            return None;
        }
        let p = 1_048_576 - i64::from(adc_p);
        let p = p
            .checked_mul(1 << 31)?
            .checked_sub(var2)?
            .checked_mul(3125)?
            .checked_div(var1)?;
        let var1 = i64::from(self.p9).checked_mul(p >> 13)?.checked_mul(p >> 13)? >> 25;
        let var2 = i64::from(self.p8).checked_mul(p)? >> 19;
        let p = (p.checked_add(var1)?.checked_add(var2)? >> 8).checked_add(i64::from(self.p7) << 4)?;
        // Q24.8 → Pa
        i32::try_from(p >> 8).ok()
    }
}

/// Pressure and temperature from one burst read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub pressure_pa: i32,
    pub temperature_c: f32,
}

pub struct Bmp280 {
    address: u8,
    calibration: Option<Calibration>,
}

impl Bmp280 {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            calibration: None,
        }
    }

    pub fn is_initialised(&self) -> bool {
        self.calibration.is_some()
    }

    /// Verify the chip id, load trimming data and start normal mode.
    pub fn init<I: I2c>(&mut self, i2c: &mut I) -> Result<(), SensorError> {
        let mut id = [0u8; 1];
        i2c.write_read(self.address, &[REG_CHIP_ID], &mut id)
            .map_err(|_| SensorError::I2cTimeout)?;
        if id[0] != CHIP_ID {
            log::warn!("bmp280: unexpected chip id 0x{:02x}", id[0]);
            return Err(SensorError::NotReady);
        }

        let mut raw = [0u8; 24];
        i2c.write_read(self.address, &[REG_CALIB_00], &mut raw)
            .map_err(|_| SensorError::I2cTimeout)?;
        i2c.write(self.address, &[REG_CONFIG, CONFIG_FILTERED])
            .map_err(|_| SensorError::I2cTimeout)?;
        i2c.write(self.address, &[REG_CTRL_MEAS, CTRL_MEAS_NORMAL])
            .map_err(|_| SensorError::I2cTimeout)?;

        self.calibration = Some(Calibration::from_bytes(&raw));
        log::info!("bmp280: ready at 0x{:02x}", self.address);
        Ok(())
    }

    /// Burst-read 0xF7..0xFC and compensate.  Initialises lazily so a sensor
    /// that was absent at boot is picked up once it answers.
    pub fn read<I: I2c>(&mut self, i2c: &mut I) -> Result<Measurement, SensorError> {
        let cal = match self.calibration {
            Some(cal) => cal,
            None => {
                self.init(i2c)?;
                self.calibration.ok_or(SensorError::NotReady)?
            }
        };

        let mut buf = [0u8; 6];
        i2c.write_read(self.address, &[REG_PRESS_MSB], &mut buf)
            .map_err(|_| SensorError::I2cTimeout)?;
        let adc_p = (i32::from(buf[0]) << 12) | (i32::from(buf[1]) << 4) | (i32::from(buf[2]) >> 4);
        let adc_t = (i32::from(buf[3]) << 12) | (i32::from(buf[4]) << 4) | (i32::from(buf[5]) >> 4);

        let (centi_c, t_fine) = cal.compensate_temperature(adc_t).ok_or(SensorError::NotReady)?;
        let pressure_pa = cal.compensate_pressure(adc_p, t_fine).ok_or(SensorError::NotReady)?;
        Ok(Measurement {
            pressure_pa,
            temperature_c: centi_c as f32 / 100.0,
        })
    }
}
