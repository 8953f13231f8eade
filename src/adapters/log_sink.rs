//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::calibration::CalibrationConfig;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// One-line JSON rendering of the calibration record.
pub fn calibration_json(config: &CalibrationConfig) -> String {
    serde_json::to_string(config).unwrap_or_else(|_| String::from("{}"))
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | tick={} | screen={:?} | T={:.1}\u{00b0}C | P={:.2}kPa | \
                     alt={:.0}m | RH={:.1}% | valid={} | alert={} | net={:?}",
                    t.tick,
                    t.screen,
                    t.reading.temperature_c,
                    t.reading.pressure_kpa,
                    t.reading.altitude_m,
                    t.reading.humidity_pct,
                    t.valid,
                    t.alerts.alert,
                    t.network,
                );
            }
            AppEvent::ScreenChanged { from, to } => {
                info!("SCREEN | {:?} -> {:?}", from, to);
            }
            AppEvent::AlertChanged(a) => {
                info!(
                    "ALERT | alert={} t_high={} t_low={} h_high={} h_low={}",
                    a.alert, a.temp_high, a.temp_low, a.humid_high, a.humid_low
                );
            }
            AppEvent::CalibrationUpdated { kind, config } => {
                info!("CALIB | {:?} applied: {}", kind, calibration_json(config));
            }
            AppEvent::CalibrationRejected { kind, error } => {
                warn!("CALIB | {:?} rejected: {}", kind, error);
            }
            AppEvent::SensorFault(e) => {
                warn!("SENSOR | read failed ({}), keeping last values", e);
            }
            AppEvent::NetworkStatusChanged(status) => {
                info!("NET | {:?}", status);
            }
            AppEvent::FactoryResetRequested => {
                warn!("RESET | joystick: entering bootloader");
            }
            AppEvent::Started(screen) => {
                info!("START | screen={:?}", screen);
            }
        }
    }
}
