//! Threshold alert evaluation.
//!
//! Boundaries are inclusive: a calibrated value equal to a threshold is
//! already in alert.  The same [`AlertStatus`] feeds both the LED matrix and
//! the per-screen status line, so the two can never disagree.

use crate::calibration::CalibrationConfig;
use crate::sensors::SensorReading;

/// Derived every tick; has no lifecycle of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlertStatus {
    pub alert: bool,
    pub temp_high: bool,
    pub temp_low: bool,
    pub humid_high: bool,
    pub humid_low: bool,
}

/// Position of one quantity relative to its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    AboveMax,
    BelowMin,
    Normal,
}

impl AlertStatus {
    /// Temperature band; `AboveMax` wins when inverted thresholds trip both.
    pub fn temperature(&self) -> Level {
        level(self.temp_high, self.temp_low)
    }

    /// Humidity band; `AboveMax` wins when inverted thresholds trip both.
    pub fn humidity(&self) -> Level {
        level(self.humid_high, self.humid_low)
    }
}

fn level(high: bool, low: bool) -> Level {
    if high {
        Level::AboveMax
    } else if low {
        Level::BelowMin
    } else {
        Level::Normal
    }
}

/// Pure evaluation of a raw reading against a calibration snapshot.
pub fn evaluate(reading: &SensorReading, cfg: &CalibrationConfig) -> AlertStatus {
    let t = reading.temperature_c + cfg.temp_offset;
    let h = reading.humidity_pct + cfg.humidity_offset;

    let temp_high = t >= cfg.temp_max;
    let temp_low = t <= cfg.temp_min;
    let humid_high = h >= cfg.humid_max;
    let humid_low = h <= cfg.humid_min;

    AlertStatus {
        alert: temp_high || temp_low || humid_high || humid_low,
        temp_high,
        temp_low,
        humid_high,
        humid_low,
    }
}
