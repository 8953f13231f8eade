//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call and every rendered frame so tests can assert
//! on the full history without touching real I2C/RMT/LEDC peripherals.

use weatherstation::app::events::AppEvent;
use weatherstation::app::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort};
use weatherstation::error::SensorError;
use weatherstation::net::NetworkStatus;
use weatherstation::sensors::{HumiditySample, PressureSample};
use weatherstation::ui::render::Frame;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    AlertIndicator(bool),
    Beep(u32),
    NetworkLed(NetworkStatus),
    EnterBootloader,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub pressure: Result<PressureSample, SensorError>,
    pub humidity: Result<HumiditySample, SensorError>,
    pub calls: Vec<ActuatorCall>,
    pub frames: Vec<Frame>,
}

#[allow(dead_code)]
impl MockHardware {
    /// Sensors report `temp_c` / `humidity_pct` at `pressure_pa`.
    pub fn with_reading(temp_c: f32, pressure_pa: i32, humidity_pct: f32) -> Self {
        Self {
            pressure: Ok(PressureSample {
                pressure_pa,
                temperature_c: temp_c + 1.0,
            }),
            humidity: Ok(HumiditySample {
                humidity_pct,
                temperature_c: temp_c,
            }),
            calls: Vec::new(),
            frames: Vec::new(),
        }
    }

    pub fn set_reading(&mut self, temp_c: f32, humidity_pct: f32) {
        self.humidity = Ok(HumiditySample {
            humidity_pct,
            temperature_c: temp_c,
        });
    }

    pub fn fail_sensors(&mut self, e: SensorError) {
        self.pressure = Err(e);
        self.humidity = Err(e);
    }

    pub fn last_frame(&self) -> &Frame {
        self.frames.last().expect("at least one frame rendered")
    }

    pub fn last_alert_indicator(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::AlertIndicator(a) => Some(*a),
            _ => None,
        })
    }

    pub fn alert_indicator_writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::AlertIndicator(_)))
            .count()
    }

    pub fn beeps(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::Beep(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl SensorPort for MockHardware {
    fn read_pressure_temperature(&mut self) -> Result<PressureSample, SensorError> {
        self.pressure
    }

    fn read_humidity_temperature(&mut self) -> Result<HumiditySample, SensorError> {
        self.humidity
    }
}

impl ActuatorPort for MockHardware {
    fn set_alert_indicator(&mut self, alert: bool) {
        self.calls.push(ActuatorCall::AlertIndicator(alert));
    }

    fn beep(&mut self, duration_ms: u32) {
        self.calls.push(ActuatorCall::Beep(duration_ms));
    }

    fn set_network_led(&mut self, status: NetworkStatus) {
        self.calls.push(ActuatorCall::NetworkLed(status));
    }

    fn enter_bootloader(&mut self) {
        self.calls.push(ActuatorCall::EnterBootloader);
    }
}

impl DisplayPort for MockHardware {
    fn render(&mut self, frame: &Frame) {
        self.frames.push(frame.clone());
    }
}

// ── LogSink ───────────────────────────────────────────────────

/// Event sink that records every event.
#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
