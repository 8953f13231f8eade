//! Alert matrix and confirmation buzzer behind one handle.
//!
//! The matrix is rewritten on every call with no diffing; the buzzer only
//! sounds when a calibration update was actually applied.

use crate::drivers::buzzer::Buzzer;
use crate::drivers::led_matrix::{LedMatrix, PixelSink};

pub struct IndicatorOutputs<P> {
    matrix: LedMatrix<P>,
    buzzer: Buzzer,
}

impl<P: PixelSink> IndicatorOutputs<P> {
    pub fn new(sink: P) -> Self {
        Self {
            matrix: LedMatrix::new(sink),
            buzzer: Buzzer::new(),
        }
    }

    pub fn set_alert_indicator(&mut self, alert: bool) {
        self.matrix.show(alert);
    }

    /// Last request wins: a beep while one is sounding restarts the timer.
    pub fn beep(&mut self, now_us: u64, duration_ms: u32) {
        self.buzzer.beep(now_us, duration_ms);
    }

    pub fn matrix(&self) -> &LedMatrix<P> {
        &self.matrix
    }

    pub fn buzzer(&self) -> &Buzzer {
        &self.buzzer
    }
}
