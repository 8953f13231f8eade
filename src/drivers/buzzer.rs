//! Confirmation buzzer.
//!
//! Two piezo transducers share one LEDC timer (CH0/CH1).  A beep switches
//! both to [`pins::BUZZER_DUTY`] and arms a one-shot timer whose callback
//! silences them again, so the control loop never waits on the tone.
//! Re-arming while a beep is still sounding restarts the countdown.

use crate::drivers::{hw_init, hw_timer};
use crate::pins;

/// Deadline bookkeeping, independent of the timer backend.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BeepSchedule {
    deadline_us: Option<u64>,
}

impl BeepSchedule {
    /// Start (or restart) a beep of `duration_ms` at `now_us`.
    pub fn arm(&mut self, now_us: u64, duration_ms: u32) {
        self.deadline_us = Some(now_us.saturating_add(u64::from(duration_ms) * 1_000));
    }

    pub fn is_active(&self, now_us: u64) -> bool {
        self.deadline_us.is_some_and(|d| now_us < d)
    }

    pub fn deadline_us(&self) -> Option<u64> {
        self.deadline_us
    }
}

pub struct Buzzer {
    schedule: BeepSchedule,
}

impl Default for Buzzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buzzer {
    pub fn new() -> Self {
        Self {
            schedule: BeepSchedule::default(),
        }
    }

    /// Sound both buzzers for `duration_ms`, counted from `now_us`.
    pub fn beep(&mut self, now_us: u64, duration_ms: u32) {
        self.schedule.arm(now_us, duration_ms);
        set_tone(true);
        hw_timer::arm_beep_stop(u64::from(duration_ms) * 1_000);
    }

    pub fn is_sounding(&self, now_us: u64) -> bool {
        self.schedule.is_active(now_us)
    }

    pub fn schedule(&self) -> BeepSchedule {
        self.schedule
    }
}

/// Drive both buzzer channels on or off.  Also called from the timer task.
pub fn set_tone(on: bool) {
    let duty = if on { pins::BUZZER_DUTY } else { 0 };
    hw_init::ledc_set(hw_init::LEDC_CH_BUZZER_A, duty);
    hw_init::ledc_set(hw_init::LEDC_CH_BUZZER_B, duty);
}
