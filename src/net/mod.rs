//! Network side of the station: a minimal HTTP responder over a non-blocking
//! TCP listener, polled from inside the control loop.
//!
//! | Module      | Role                                              |
//! |-------------|---------------------------------------------------|
//! | `transport` | `Listener` / `Connection` traits + `std::net` impl |
//! | `routes`    | request classification and response bodies        |
//! | `http`      | per-connection state machine (`HttpConfigServer`) |

pub mod http;
pub mod routes;
pub mod transport;

use crate::calibration::CalibratedReading;
use crate::error::ParseError;

/// Wi-Fi bring-up progress, mirrored on the Home screen and the RGB LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkStatus {
    #[default]
    NotStarted,
    Connecting,
    Failed,
    Connected,
}

/// What the HTTP layer needs from the rest of the station.
///
/// Implemented by the control loop for the duration of its network phase,
/// so every mutation happens on the loop's own stack.
pub trait RequestHandler {
    /// Parse and apply `temp_min=..&temp_max=..&umi_min=..&umi_max=..`.
    fn apply_thresholds(&mut self, query: &str) -> Result<(), ParseError>;

    /// Parse and apply `temp_off=..&pres_off=..&alt_off=..&umi_off=..`.
    fn apply_offsets(&mut self, query: &str) -> Result<(), ParseError>;

    /// Latest reading, calibrated with the configuration current right now.
    fn telemetry(&self) -> CalibratedReading;
}
