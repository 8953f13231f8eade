//! Runtime calibration: sensor offsets and alert thresholds.
//!
//! The [`CalibrationStore`] is owned by the control loop.  Readers always get
//! a [`CalibrationConfig`] copy via [`CalibrationStore::snapshot`]; writers
//! hand over a raw `key=value&...` query and the store either replaces the
//! whole record or leaves it untouched.
//!
//! Query format (fixed key order, extra trailing pairs ignored):
//!
//! | Update      | Keys                                          |
//! |-------------|-----------------------------------------------|
//! | thresholds  | `temp_min`, `temp_max`, `umi_min`, `umi_max`  |
//! | offsets     | `temp_off`, `pres_off`, `alt_off`, `umi_off`  |

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::sensors::SensorReading;

/// Keys of a threshold update, in the order they must appear.
pub const THRESHOLD_KEYS: [&str; 4] = ["temp_min", "temp_max", "umi_min", "umi_max"];
/// Keys of an offset update, in the order they must appear.
pub const OFFSET_KEYS: [&str; 4] = ["temp_off", "pres_off", "alt_off", "umi_off"];

/// Offsets and thresholds.  No `min < max` ordering is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Added to the raw temperature (°C).
    pub temp_offset: f32,
    /// Added to the pressure after conversion to kPa.
    pub pressure_offset: f32,
    /// Added to the derived altitude (m).
    pub altitude_offset: f32,
    /// Added to the raw relative humidity (%).
    pub humidity_offset: f32,
    pub temp_min: f32,
    pub temp_max: f32,
    pub humid_min: f32,
    pub humid_max: f32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            temp_offset: 0.0,
            pressure_offset: 0.0,
            altitude_offset: 0.0,
            humidity_offset: 0.0,
            temp_min: 10.0,
            temp_max: 35.0,
            humid_min: 30.0,
            humid_max: 70.0,
        }
    }
}

/// Sensor values with offsets applied, in presentation units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibratedReading {
    pub temperature_c: f32,
    pub pressure_kpa: f32,
    pub altitude_m: f32,
    pub humidity_pct: f32,
}

impl CalibrationConfig {
    /// Apply the four offsets to a raw reading.
    pub fn calibrate(&self, reading: &SensorReading) -> CalibratedReading {
        CalibratedReading {
            temperature_c: reading.temperature_c + self.temp_offset,
            pressure_kpa: reading.pressure_pa as f32 / 1000.0 + self.pressure_offset,
            altitude_m: (reading.altitude_m + f64::from(self.altitude_offset)) as f32,
            humidity_pct: reading.humidity_pct + self.humidity_offset,
        }
    }

    /// Copy with the four thresholds replaced.
    fn with_thresholds(self, [temp_min, temp_max, humid_min, humid_max]: [f32; 4]) -> Self {
        Self {
            temp_min,
            temp_max,
            humid_min,
            humid_max,
            ..self
        }
    }

    /// Copy with the four offsets replaced.
    fn with_offsets(self, [temp, pressure, altitude, humidity]: [f32; 4]) -> Self {
        Self {
            temp_offset: temp,
            pressure_offset: pressure,
            altitude_offset: altitude,
            humidity_offset: humidity,
            ..self
        }
    }
}

/// Parse exactly four `key=float` pairs in `keys` order.
///
/// Numbers go through `f32::from_str`, so `12abc` is rejected while `-1.5`,
/// `1e3`, `inf` and `NaN` are accepted.  Pairs after the fourth are ignored.
pub fn parse_fields(query: &str, keys: &[&'static str; 4]) -> Result<[f32; 4], ParseError> {
    let mut pairs = query.split('&');
    let mut values = [0.0_f32; 4];
    for (slot, &key) in values.iter_mut().zip(keys) {
        let (name, raw) = pairs
            .next()
            .and_then(|pair| pair.split_once('='))
            .ok_or(ParseError::MissingField(key))?;
        if name != key {
            return Err(ParseError::MissingField(key));
        }
        *slot = raw.parse().map_err(|_| ParseError::InvalidNumber(key))?;
    }
    Ok(values)
}

/// Owner of the live calibration record.
#[derive(Debug, Default)]
pub struct CalibrationStore {
    current: CalibrationConfig,
}

impl CalibrationStore {
    pub fn new(initial: CalibrationConfig) -> Self {
        Self { current: initial }
    }

    /// Copy of the current record.
    pub fn snapshot(&self) -> CalibrationConfig {
        self.current
    }

    /// Replace all four thresholds, or nothing if any field fails to parse.
    pub fn apply_thresholds(&mut self, query: &str) -> Result<(), ParseError> {
        let values = parse_fields(query, &THRESHOLD_KEYS)?;
        self.current = self.current.with_thresholds(values);
        Ok(())
    }

    /// Replace all four offsets, or nothing if any field fails to parse.
    pub fn apply_offsets(&mut self, query: &str) -> Result<(), ParseError> {
        let values = parse_fields(query, &OFFSET_KEYS)?;
        self.current = self.current.with_offsets(values);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_factory_thresholds() {
        let c = CalibrationConfig::default();
        assert_eq!((c.temp_min, c.temp_max), (10.0, 35.0));
        assert_eq!((c.humid_min, c.humid_max), (30.0, 70.0));
        assert_eq!(c.temp_offset, 0.0);
        assert_eq!(c.humidity_offset, 0.0);
    }

    #[test]
    fn thresholds_replaced_together() {
        let mut store = CalibrationStore::default();
        store
            .apply_thresholds("temp_min=5&temp_max=40.5&umi_min=20&umi_max=80")
            .unwrap();
        let c = store.snapshot();
        assert_eq!((c.temp_min, c.temp_max, c.humid_min, c.humid_max), (5.0, 40.5, 20.0, 80.0));
        assert_eq!(c.temp_offset, 0.0, "offsets untouched");
    }

    #[test]
    fn bad_first_field_discards_whole_update() {
        let mut store = CalibrationStore::default();
        let err = store
            .apply_thresholds("temp_min=abc&temp_max=35&umi_min=30&umi_max=70")
            .unwrap_err();
        assert_eq!(err, ParseError::InvalidNumber("temp_min"));
        assert_eq!(store.snapshot(), CalibrationConfig::default());
    }

    #[test]
    fn bad_last_field_discards_whole_update() {
        let mut store = CalibrationStore::default();
        assert!(store.apply_offsets("temp_off=1&pres_off=2&alt_off=3&umi_off=").is_err());
        assert_eq!(store.snapshot(), CalibrationConfig::default());
    }

    #[test]
    fn trailing_garbage_in_number_is_rejected() {
        assert_eq!(
            parse_fields("temp_min=12abc&temp_max=1&umi_min=1&umi_max=1", &THRESHOLD_KEYS),
            Err(ParseError::InvalidNumber("temp_min"))
        );
    }

    #[test]
    fn keys_must_appear_in_order() {
        assert_eq!(
            parse_fields("temp_max=1&temp_min=1&umi_min=1&umi_max=1", &THRESHOLD_KEYS),
            Err(ParseError::MissingField("temp_min"))
        );
        assert_eq!(
            parse_fields("temp_min=1&temp_max=1", &THRESHOLD_KEYS),
            Err(ParseError::MissingField("umi_min"))
        );
    }

    #[test]
    fn extra_pairs_are_ignored() {
        let v = parse_fields("temp_off=-1.5&pres_off=0&alt_off=12&umi_off=2&x=y", &OFFSET_KEYS).unwrap();
        assert_eq!(v, [-1.5, 0.0, 12.0, 2.0]);
    }

    #[test]
    fn inverted_thresholds_are_accepted() {
        let mut store = CalibrationStore::default();
        store
            .apply_thresholds("temp_min=50&temp_max=-10&umi_min=90&umi_max=10")
            .unwrap();
        assert_eq!(store.snapshot().temp_min, 50.0);
    }

    #[test]
    fn calibrate_applies_offsets_and_kpa_conversion() {
        let cfg = CalibrationConfig {
            temp_offset: -1.5,
            pressure_offset: 0.25,
            altitude_offset: 10.0,
            humidity_offset: 2.0,
            ..CalibrationConfig::default()
        };
        let reading = SensorReading {
            temperature_c: 20.0,
            pressure_pa: 101_325,
            humidity_pct: 50.0,
            altitude_m: 0.0,
            valid: true,
        };
        let c = cfg.calibrate(&reading);
        assert!((c.temperature_c - 18.5).abs() < 1e-6);
        assert!((c.pressure_kpa - 101.575).abs() < 1e-3);
        assert!((c.altitude_m - 10.0).abs() < 1e-6);
        assert!((c.humidity_pct - 52.0).abs() < 1e-6);
    }
}
