//! Outbound application events.
//!
//! The [`StationService`](super::service::StationService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log today).

use crate::alerts::AlertStatus;
use crate::calibration::{CalibratedReading, CalibrationConfig};
use crate::error::{ParseError, SensorError};
use crate::net::NetworkStatus;
use crate::ui::ScreenState;

/// Which half of the calibration record an HTTP update targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationKind {
    Thresholds,
    Offsets,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the initial screen).
    Started(ScreenState),

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),

    /// A navigation command moved the UI.
    ScreenChanged { from: ScreenState, to: ScreenState },

    /// The aggregate alert flag flipped.
    AlertChanged(AlertStatus),

    /// An HTTP update replaced part of the calibration record.
    CalibrationUpdated { kind: CalibrationKind, config: CalibrationConfig },

    /// An HTTP update was discarded.
    CalibrationRejected { kind: CalibrationKind, error: ParseError },

    /// A sensor read failed; stale values remain in use.
    SensorFault(SensorError),

    /// Wi-Fi bring-up progressed.
    NetworkStatusChanged(NetworkStatus),

    /// The joystick asked for a reboot into the bootloader.
    FactoryResetRequested,
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryData {
    pub tick: u64,
    pub screen: ScreenState,
    pub reading: CalibratedReading,
    pub valid: bool,
    pub alerts: AlertStatus,
    pub network: NetworkStatus,
}
