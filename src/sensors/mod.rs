//! Sensor subsystem: I2C drivers and the [`SensorAcquisition`] stage.
//!
//! Acquisition keeps exactly one piece of state: the last reading.  A failed
//! read never zeroes it; the previous values are kept verbatim and flagged
//! `valid = false` until a read succeeds again.

pub mod aht20;
pub mod bmp280;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::warn;

use crate::app::ports::SensorPort;
use crate::error::SensorError;
use aht20::Aht20;
use bmp280::Bmp280;

/// Reference sea-level pressure for the barometric formula.
pub const SEA_LEVEL_PA: f64 = 101_325.0;

/// International barometric formula, pressure in pascals.
pub fn altitude_m(pressure_pa: f64) -> f64 {
    44_330.0 * (1.0 - (pressure_pa / SEA_LEVEL_PA).powf(0.1903))
}

/// Output of the pressure collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureSample {
    pub pressure_pa: i32,
    pub temperature_c: f32,
}

/// Output of the humidity collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumiditySample {
    pub humidity_pct: f32,
    pub temperature_c: f32,
}

/// One tick's worth of raw sensor data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorReading {
    /// From the humidity sensor, which sits away from the board's hot spots.
    pub temperature_c: f32,
    pub pressure_pa: i32,
    pub humidity_pct: f32,
    pub altitude_m: f64,
    pub valid: bool,
}

/// Produces a [`SensorReading`] per tick with a stale-on-error policy.
#[derive(Debug, Default)]
pub struct SensorAcquisition {
    latest: SensorReading,
    /// Die temperature of the pressure sensor, kept for diagnostics.
    pressure_die_c: f32,
}

impl SensorAcquisition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read both collaborators.  On error the previous reading is retained
    /// with `valid = false` and the error is returned for logging.
    pub fn read(&mut self, port: &mut impl SensorPort) -> Result<SensorReading, SensorError> {
        let result = port
            .read_pressure_temperature()
            .and_then(|p| port.read_humidity_temperature().map(|h| (p, h)));

        match result {
            Ok((p, h)) => {
                self.pressure_die_c = p.temperature_c;
                self.latest = SensorReading {
                    temperature_c: h.temperature_c,
                    pressure_pa: p.pressure_pa,
                    humidity_pct: h.humidity_pct,
                    altitude_m: altitude_m(f64::from(p.pressure_pa)),
                    valid: true,
                };
                Ok(self.latest)
            }
            Err(e) => {
                warn!("sensors: read failed ({}), keeping previous values", e);
                self.latest.valid = false;
                Err(e)
            }
        }
    }

    /// Most recent reading, possibly stale.
    pub fn latest(&self) -> SensorReading {
        self.latest
    }

    pub fn pressure_die_c(&self) -> f32 {
        self.pressure_die_c
    }
}

// ── I2C-backed SensorPort ─────────────────────────────────────

/// BMP280 + AHT20 sharing one I2C controller.
pub struct I2cSensors<I, D> {
    i2c: I,
    delay: D,
    bmp: Bmp280,
    aht: Aht20,
}

impl<I: I2c, D: DelayNs> I2cSensors<I, D> {
    /// Probe both devices.  A probe failure is logged, not fatal: each
    /// driver re-initialises itself on the next read.
    pub fn new(i2c: I, delay: D) -> Self {
        let mut sensors = Self {
            i2c,
            delay,
            bmp: Bmp280::new(bmp280::DEFAULT_ADDRESS),
            aht: Aht20::new(aht20::DEFAULT_ADDRESS),
        };
        if let Err(e) = sensors.bmp.init(&mut sensors.i2c) {
            warn!("bmp280: probe failed ({})", e);
        }
        if let Err(e) = sensors.aht.init(&mut sensors.i2c, &mut sensors.delay) {
            warn!("aht20: probe failed ({})", e);
        }
        sensors
    }
}

impl<I: I2c, D: DelayNs> SensorPort for I2cSensors<I, D> {
    fn read_pressure_temperature(&mut self) -> Result<PressureSample, SensorError> {
        let m = self.bmp.read(&mut self.i2c)?;
        Ok(PressureSample {
            pressure_pa: m.pressure_pa,
            temperature_c: m.temperature_c,
        })
    }

    fn read_humidity_temperature(&mut self) -> Result<HumiditySample, SensorError> {
        let m = self.aht.read(&mut self.i2c, &mut self.delay)?;
        Ok(HumiditySample {
            humidity_pct: m.humidity_pct,
            temperature_c: m.temperature_c,
        })
    }
}
