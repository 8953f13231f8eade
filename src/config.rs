//! System configuration parameters
//!
//! All tunable parameters for the weather station.  Calibration values
//! (thresholds and offsets) live in [`crate::calibration`] because they
//! change at runtime; everything here is fixed for the lifetime of a boot.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    // --- Timing ---
    /// Pause at the end of every control-loop tick (milliseconds)
    pub tick_interval_ms: u32,
    /// Minimum spacing between accepted button edges (microseconds)
    pub debounce_us: u32,
    /// Emit a telemetry event every N ticks (0 disables)
    pub telemetry_log_every_ticks: u32,

    // --- Buzzer ---
    /// Length of the confirmation beep after a calibration update
    pub confirmation_beep_ms: u32,
    /// Buzzer tone frequency
    pub buzzer_freq_hz: u32,

    // --- Network ---
    /// TCP port of the configuration web server
    pub http_port: u16,
    /// Keep monitoring when Wi-Fi bring-up fails
    pub run_without_network: bool,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_interval_ms: 300,
            debounce_us: 1_000_000, // 1 s, shared by all buttons
            telemetry_log_every_ticks: 10,

            // Buzzer
            confirmation_beep_ms: 200,
            buzzer_freq_hz: 1_000,

            // Network
            http_port: 80,
            run_without_network: true,
        }
    }
}
