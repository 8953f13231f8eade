//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the sensor bus, the alert matrix and buzzer, the status LED and the
//! OLED, exposing them through [`SensorPort`], [`ActuatorPort`] and
//! [`DisplayPort`].  On non-espidf targets the LEDC-backed drivers use
//! cfg-gated simulation stubs, so the same adapter runs in host tests.

use crate::adapters::bootloader;
use crate::adapters::time::MonotonicClock;
use crate::app::ports::{ActuatorPort, DisplayPort, SensorPort};
use crate::drivers::indicators::IndicatorOutputs;
use crate::drivers::led_matrix::PixelSink;
use crate::drivers::status_led::StatusLed;
use crate::error::SensorError;
use crate::net::NetworkStatus;
use crate::sensors::{HumiditySample, PressureSample};
use crate::ui::render::Frame;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<S, P, D> {
    sensors: S,
    indicators: IndicatorOutputs<P>,
    led: StatusLed,
    display: D,
    clock: MonotonicClock,
}

impl<S, P: PixelSink, D> HardwareAdapter<S, P, D> {
    pub fn new(sensors: S, pixels: P, display: D) -> Self {
        Self {
            sensors,
            indicators: IndicatorOutputs::new(pixels),
            led: StatusLed::new(),
            display,
            clock: MonotonicClock::new(),
        }
    }

    pub fn indicators(&self) -> &IndicatorOutputs<P> {
        &self.indicators
    }

    pub fn status_led(&self) -> &StatusLed {
        &self.led
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<S: SensorPort, P, D> SensorPort for HardwareAdapter<S, P, D> {
    fn read_pressure_temperature(&mut self) -> Result<PressureSample, SensorError> {
        self.sensors.read_pressure_temperature()
    }

    fn read_humidity_temperature(&mut self) -> Result<HumiditySample, SensorError> {
        self.sensors.read_humidity_temperature()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<S, P: PixelSink, D> ActuatorPort for HardwareAdapter<S, P, D> {
    fn set_alert_indicator(&mut self, alert: bool) {
        self.indicators.set_alert_indicator(alert);
    }

    fn beep(&mut self, duration_ms: u32) {
        let now = self.clock.uptime_us();
        self.indicators.beep(now, duration_ms);
    }

    fn set_network_led(&mut self, status: NetworkStatus) {
        self.led.show(status);
    }

    fn enter_bootloader(&mut self) {
        bootloader::enter_bootloader();
    }
}

// ── DisplayPort implementation ────────────────────────────────

impl<S, P, D: DisplayPort> DisplayPort for HardwareAdapter<S, P, D> {
    fn render(&mut self, frame: &Frame) {
        self.display.render(frame);
    }
}
