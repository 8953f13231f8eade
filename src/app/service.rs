//! Application service, the hexagonal core.
//!
//! [`StationService`] owns every piece of mutable station state: the
//! calibration record, the last sensor reading, the current screen, the
//! derived alert status and the network status.  Nothing else holds a
//! reference to them; the HTTP layer and the button ISRs reach them only
//! through [`RequestHandler`] and the [`CommandMailbox`].
//!
//! ```text
//!  CommandMailbox ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!  NetworkPort   ◀──▶ │      StationService      │
//!  SensorPort    ──▶  │ Calibration · Alerts · UI │ ──▶ ActuatorPort / DisplayPort
//!                     └──────────────────────────┘
//! ```
//!
//! One [`tick`](StationService::tick) runs the phases in a fixed order:
//! input → network → sensors → alerts → indicators → screen → telemetry.
//! A calibration change accepted in the network phase is therefore visible
//! to the alert evaluation of the same tick.

use std::net::Ipv4Addr;

use log::{info, warn};

use crate::alerts::{self, AlertStatus};
use crate::calibration::{CalibratedReading, CalibrationConfig, CalibrationStore};
use crate::config::StationConfig;
use crate::error::ParseError;
use crate::events::CommandMailbox;
use crate::net::{NetworkStatus, RequestHandler};
use crate::sensors::{SensorAcquisition, SensorReading};
use crate::ui::render::{self, ScreenInputs};
use crate::ui::{Direction, ScreenState};

use super::commands::InputCommand;
use super::events::{AppEvent, CalibrationKind, TelemetryData};
use super::ports::{ActuatorPort, DisplayPort, EventSink, NetworkPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// StationService
// ───────────────────────────────────────────────────────────────

pub struct StationService {
    config: StationConfig,
    calibration: CalibrationStore,
    sensors: SensorAcquisition,
    screen: ScreenState,
    alerts: AlertStatus,
    network: NetworkStatus,
    ip: Option<Ipv4Addr>,
    sensor_fault: bool,
    tick_count: u64,
}

impl StationService {
    /// Construct with factory calibration.
    pub fn new(config: StationConfig) -> Self {
        Self::with_calibration(config, CalibrationConfig::default())
    }

    pub fn with_calibration(config: StationConfig, calibration: CalibrationConfig) -> Self {
        Self {
            config,
            calibration: CalibrationStore::new(calibration),
            sensors: SensorAcquisition::new(),
            screen: ScreenState::default(),
            alerts: AlertStatus::default(),
            network: NetworkStatus::NotStarted,
            ip: None,
            sensor_fault: false,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Show the boot screen and the initial LED colour.
    pub fn start(&mut self, hw: &mut (impl ActuatorPort + DisplayPort), sink: &mut impl EventSink) {
        hw.set_network_led(self.network);
        self.render(hw);
        sink.emit(&AppEvent::Started(self.screen));
        info!("StationService started on {:?}", self.screen);
    }

    /// Record Wi-Fi progress and redraw immediately so startup is visible
    /// before the first tick.
    pub fn set_network_status(
        &mut self,
        status: NetworkStatus,
        ip: Option<Ipv4Addr>,
        hw: &mut (impl ActuatorPort + DisplayPort),
        sink: &mut impl EventSink,
    ) {
        self.network = status;
        self.ip = ip;
        hw.set_network_led(status);
        self.render(hw);
        sink.emit(&AppEvent::NetworkStatusChanged(status));
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle.  The caller sleeps
    /// [`tick_interval_ms`](StationConfig::tick_interval_ms) between calls.
    pub fn tick<H, N, S>(&mut self, mailbox: &CommandMailbox, net: &mut N, hw: &mut H, sink: &mut S)
    where
        H: SensorPort + ActuatorPort + DisplayPort,
        N: NetworkPort,
        S: EventSink,
    {
        self.tick_count += 1;

        // 1. Local input (at most one command per tick)
        if let Some(cmd) = mailbox.take() {
            self.handle_input(cmd, hw, sink);
        }

        // 2. Network: may replace the calibration record
        let mut phase = NetworkPhase {
            calibration: &mut self.calibration,
            latest: self.sensors.latest(),
            beep_ms: self.config.confirmation_beep_ms,
            hw: &mut *hw,
            sink: &mut *sink,
        };
        net.service(&mut phase);

        // 3. Sensors (stale on error)
        match self.sensors.read(hw) {
            Ok(_) => self.sensor_fault = false,
            Err(e) => {
                if !self.sensor_fault {
                    sink.emit(&AppEvent::SensorFault(e));
                }
                self.sensor_fault = true;
            }
        }

        // 4. Alerts against a fresh snapshot
        let reading = self.sensors.latest();
        let status = alerts::evaluate(&reading, &self.calibration.snapshot());
        if status != self.alerts {
            sink.emit(&AppEvent::AlertChanged(status));
        }
        self.alerts = status;

        // 5. Indicators, refreshed unconditionally
        hw.set_alert_indicator(status.alert);

        // 6. Screen
        self.render(hw);

        // 7. Periodic telemetry
        let every = u64::from(self.config.telemetry_log_every_ticks);
        if every > 0 && self.tick_count % every == 0 {
            sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
        }
    }

    // ── Command handling ──────────────────────────────────────

    fn handle_input(&mut self, cmd: InputCommand, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        let direction = match cmd {
            InputCommand::Previous => Direction::Previous,
            InputCommand::Next => Direction::Next,
            InputCommand::FactoryReset => {
                warn!("Joystick pressed: rebooting into bootloader");
                sink.emit(&AppEvent::FactoryResetRequested);
                hw.enter_bootloader();
                return;
            }
        };
        let from = self.screen;
        self.screen = from.advance(direction);
        sink.emit(&AppEvent::ScreenChanged { from, to: self.screen });
    }

    fn render(&self, hw: &mut impl DisplayPort) {
        let calibration = self.calibration.snapshot();
        let frame = render::render(&ScreenInputs {
            screen: self.screen,
            reading: calibration.calibrate(&self.sensors.latest()),
            calibration,
            alerts: self.alerts,
            network: self.network,
            ip: self.ip,
        });
        hw.render(&frame);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn build_telemetry(&self) -> TelemetryData {
        let raw = self.sensors.latest();
        TelemetryData {
            tick: self.tick_count,
            screen: self.screen,
            reading: self.calibration.snapshot().calibrate(&raw),
            valid: raw.valid,
            alerts: self.alerts,
            network: self.network,
        }
    }

    pub fn screen(&self) -> ScreenState {
        self.screen
    }

    pub fn alerts(&self) -> AlertStatus {
        self.alerts
    }

    /// Copy of the live calibration record.
    pub fn calibration(&self) -> CalibrationConfig {
        self.calibration.snapshot()
    }

    pub fn latest_reading(&self) -> SensorReading {
        self.sensors.latest()
    }

    pub fn network_status(&self) -> NetworkStatus {
        self.network
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn tick_interval_ms(&self) -> u32 {
        self.config.tick_interval_ms
    }
}

// ───────────────────────────────────────────────────────────────
// Network phase
// ───────────────────────────────────────────────────────────────

/// Borrowed view of the service handed to the HTTP layer for one poll.
struct NetworkPhase<'a, A, S> {
    calibration: &'a mut CalibrationStore,
    latest: SensorReading,
    beep_ms: u32,
    hw: &'a mut A,
    sink: &'a mut S,
}

impl<A: ActuatorPort, S: EventSink> NetworkPhase<'_, A, S> {
    fn finish(&mut self, kind: CalibrationKind, result: Result<(), ParseError>) -> Result<(), ParseError> {
        match result {
            Ok(()) => {
                self.hw.beep(self.beep_ms);
                self.sink.emit(&AppEvent::CalibrationUpdated {
                    kind,
                    config: self.calibration.snapshot(),
                });
            }
            Err(error) => self.sink.emit(&AppEvent::CalibrationRejected { kind, error }),
        }
        result
    }
}

impl<A: ActuatorPort, S: EventSink> RequestHandler for NetworkPhase<'_, A, S> {
    fn apply_thresholds(&mut self, query: &str) -> Result<(), ParseError> {
        let result = self.calibration.apply_thresholds(query);
        self.finish(CalibrationKind::Thresholds, result)
    }

    fn apply_offsets(&mut self, query: &str) -> Result<(), ParseError> {
        let result = self.calibration.apply_offsets(query);
        self.finish(CalibrationKind::Offsets, result)
    }

    fn telemetry(&self) -> CalibratedReading {
        self.calibration.snapshot().calibrate(&self.latest)
    }
}
