//! Aosong AHT20 relative-humidity / temperature sensor.
//!
//! Each measurement is a trigger command, an ~80 ms conversion and a 7-byte
//! read: status, 20-bit humidity, 20-bit temperature, CRC-8.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::error::SensorError;

pub const DEFAULT_ADDRESS: u8 = 0x38;

const CMD_INIT: [u8; 3] = [0xBE, 0x08, 0x00];
const CMD_TRIGGER: [u8; 3] = [0xAC, 0x33, 0x00];

const STATUS_BUSY: u8 = 0x80;
const STATUS_CALIBRATED: u8 = 0x08;

const CONVERSION_MS: u32 = 80;
const POWER_ON_MS: u32 = 40;

/// CRC-8, polynomial 0x31, initial value 0xFF.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0xFF;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x31
            } else {
                crc << 1
            };
        }
    }
    crc
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub humidity_pct: f32,
    pub temperature_c: f32,
}

/// Decode a raw 7-byte frame.
pub fn decode(frame: &[u8; 7]) -> Result<Measurement, SensorError> {
    if crc8(&frame[..6]) != frame[6] {
        return Err(SensorError::ChecksumMismatch);
    }
    if frame[0] & STATUS_BUSY != 0 {
        return Err(SensorError::NotReady);
    }
    let raw_h = (u32::from(frame[1]) << 12) | (u32::from(frame[2]) << 4) | (u32::from(frame[3]) >> 4);
    let raw_t = ((u32::from(frame[3]) & 0x0F) << 16) | (u32::from(frame[4]) << 8) | u32::from(frame[5]);
    let full_scale = (1u32 << 20) as f32;
    Ok(Measurement {
        humidity_pct: raw_h as f32 / full_scale * 100.0,
        temperature_c: raw_t as f32 / full_scale * 200.0 - 50.0,
    })
}

pub struct Aht20 {
    address: u8,
    calibrated: bool,
}

impl Aht20 {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            calibrated: false,
        }
    }

    /// Send the init/calibrate command if the status byte asks for it.
    pub fn init<I: I2c, D: DelayNs>(&mut self, i2c: &mut I, delay: &mut D) -> Result<(), SensorError> {
        delay.delay_ms(POWER_ON_MS);
        let mut status = [0u8; 1];
        i2c.read(self.address, &mut status)
            .map_err(|_| SensorError::I2cTimeout)?;
        if status[0] & STATUS_CALIBRATED == 0 {
            i2c.write(self.address, &CMD_INIT)
                .map_err(|_| SensorError::I2cTimeout)?;
            delay.delay_ms(10);
        }
        self.calibrated = true;
        log::info!("aht20: ready at 0x{:02x}", self.address);
        Ok(())
    }

    /// Trigger, wait, read and verify one measurement.
    pub fn read<I: I2c, D: DelayNs>(&mut self, i2c: &mut I, delay: &mut D) -> Result<Measurement, SensorError> {
        if !self.calibrated {
            self.init(i2c, delay)?;
        }
        i2c.write(self.address, &CMD_TRIGGER)
            .map_err(|_| SensorError::I2cTimeout)?;
        delay.delay_ms(CONVERSION_MS);

        let mut frame = [0u8; 7];
        i2c.read(self.address, &mut frame)
            .map_err(|_| SensorError::I2cTimeout)?;
        decode(&frame)
    }
}
