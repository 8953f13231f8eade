//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ StationService (domain)
//! ```
//!
//! Driven adapters (sensors, indicators, display, network, event sinks)
//! implement these traits.  The [`StationService`](super::service::StationService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::error::SensorError;
use crate::net::{NetworkStatus, RequestHandler};
use crate::sensors::{HumiditySample, PressureSample};
use crate::ui::render::Frame;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// The two sensor collaborators polled once per tick.
pub trait SensorPort {
    /// Barometric sensor: pressure (Pa) and its die temperature.
    fn read_pressure_temperature(&mut self) -> Result<PressureSample, SensorError>;

    /// Hygrometer: relative humidity (%) and ambient temperature.
    fn read_humidity_temperature(&mut self) -> Result<HumiditySample, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

pub trait ActuatorPort {
    /// Show the "alert" or "ok" LED-matrix pattern.  Called every tick.
    fn set_alert_indicator(&mut self, alert: bool);

    /// Sound the buzzer for `duration_ms`; a new call restarts the timer.
    fn beep(&mut self, duration_ms: u32);

    /// Mirror Wi-Fi progress on the RGB status LED.
    fn set_network_led(&mut self, status: NetworkStatus);

    /// Hand control to the bootloader.  Does not return on hardware.
    fn enter_bootloader(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Display port
// ───────────────────────────────────────────────────────────────

pub trait DisplayPort {
    /// Clear, draw `frame` and push it to the panel.
    fn render(&mut self, frame: &Frame);
}

// ───────────────────────────────────────────────────────────────
// Network port
// ───────────────────────────────────────────────────────────────

/// Drained synchronously inside the tick; never runs on another thread.
pub trait NetworkPort {
    fn service(&mut self, handler: &mut impl RequestHandler);
}

/// Network-less operation after a failed bring-up.
impl<N: NetworkPort> NetworkPort for Option<N> {
    fn service(&mut self, handler: &mut impl RequestHandler) {
        if let Some(net) = self {
            net.service(handler);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
