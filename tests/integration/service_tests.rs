//! Integration tests for the StationService control loop: mailbox → HTTP →
//! sensors → alerts → indicators → screen, against mock adapters.

use std::net::Ipv4Addr;

use weatherstation::app::commands::InputCommand;
use weatherstation::app::events::{AppEvent, CalibrationKind};
use weatherstation::app::service::StationService;
use weatherstation::config::StationConfig;
use weatherstation::drivers::button::{Button, ButtonInputHandler};
use weatherstation::error::SensorError;
use weatherstation::events::CommandMailbox;
use weatherstation::net::NetworkStatus;
use weatherstation::net::http::HttpConfigServer;
use weatherstation::ui::ScreenState;

use crate::mock_hw::{ActuatorCall, LogSink, MockHardware};
use crate::mock_net::MemListener;

struct Rig {
    app: StationService,
    hw: MockHardware,
    sink: LogSink,
    mailbox: CommandMailbox,
    net: MemListener,
    server: Option<HttpConfigServer<MemListener>>,
}

impl Rig {
    fn new(temp_c: f32, humidity_pct: f32) -> Self {
        let net = MemListener::new();
        let mut rig = Self {
            app: StationService::new(StationConfig::default()),
            hw: MockHardware::with_reading(temp_c, 101_325, humidity_pct),
            sink: LogSink::new(),
            mailbox: CommandMailbox::new(),
            server: Some(HttpConfigServer::new(net.clone())),
            net,
        };
        rig.app.start(&mut rig.hw, &mut rig.sink);
        rig
    }

    fn offline(temp_c: f32, humidity_pct: f32) -> Self {
        let mut rig = Self::new(temp_c, humidity_pct);
        rig.server = None;
        rig
    }

    fn tick(&mut self) {
        self.app
            .tick(&self.mailbox, &mut self.server, &mut self.hw, &mut self.sink);
    }

    fn goto(&mut self, screen: ScreenState) {
        while self.app.screen() != screen {
            self.mailbox.post(InputCommand::Next);
            self.tick();
        }
    }
}

// ── Alerts and indicators ─────────────────────────────────────

#[test]
fn hot_reading_raises_alert_on_matrix_and_screen() {
    let mut rig = Rig::new(36.2, 50.0);
    rig.tick();
    assert!(rig.app.alerts().alert);
    assert_eq!(rig.hw.last_alert_indicator(), Some(true));

    rig.goto(ScreenState::TemperatureDetail);
    assert!(rig.hw.last_frame().contains_text("Alerta: T > Max"));
}

#[test]
fn comfortable_reading_shows_ok() {
    let mut rig = Rig::new(22.0, 50.0);
    rig.tick();
    assert!(!rig.app.alerts().alert);
    assert_eq!(rig.hw.last_alert_indicator(), Some(false));
    rig.goto(ScreenState::HumidityDetail);
    assert!(rig.hw.last_frame().contains_text("Status: Ok"));
}

#[test]
fn threshold_boundaries_are_inclusive() {
    let mut rig = Rig::new(35.0, 50.0);
    rig.tick();
    assert!(rig.app.alerts().temp_high);

    rig.hw.set_reading(22.0, 70.0);
    rig.tick();
    assert!(rig.app.alerts().humid_high);
    assert!(!rig.app.alerts().temp_high);
}

#[test]
fn indicator_is_rewritten_every_tick() {
    let mut rig = Rig::new(22.0, 50.0);
    rig.hw.clear_calls();
    for _ in 0..3 {
        rig.tick();
    }
    assert_eq!(rig.hw.alert_indicator_writes(), 3);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::AlertChanged(_))),
        0,
        "no change event while the status is steady"
    );
}

// ── Calibration over HTTP ─────────────────────────────────────

#[test]
fn limits_update_is_visible_to_same_tick_alerts() {
    let mut rig = Rig::new(36.2, 50.0);
    rig.tick();
    assert!(rig.app.alerts().alert);

    rig.net
        .request("GET /set_limits?temp_min=10&temp_max=40&umi_min=30&umi_max=70");
    rig.tick();
    assert_eq!(rig.app.calibration().temp_max, 40.0);
    assert!(!rig.app.alerts().alert);
    assert_eq!(rig.hw.last_alert_indicator(), Some(false));
}

#[test]
fn offsets_flow_into_dados_and_screen() {
    let mut rig = Rig::new(20.0, 50.0);
    rig.tick();
    rig.net
        .request("GET /set_offsets?temp_off=-1.5&pres_off=0&alt_off=0&umi_off=0");
    rig.tick();

    let dados = rig.net.request("GET /dados");
    rig.tick();
    let body = dados.body();
    assert!(body.starts_with(r#"{"tem":18.5,"pre":101.3"#), "{}", body);
    assert!(body.ends_with(r#""alt":0,"umi":50.0}"#), "{}", body);

    rig.goto(ScreenState::Overview);
    assert!(rig.hw.last_frame().contains_text("18.5C"));
}

#[test]
fn nan_offset_keeps_dados_parseable() {
    let mut rig = Rig::new(20.0, 50.0);
    rig.tick();
    rig.net
        .request("GET /set_offsets?temp_off=NaN&pres_off=0&alt_off=0&umi_off=0");
    rig.tick();

    let dados = rig.net.request("GET /dados");
    rig.tick();
    let v: serde_json::Value = serde_json::from_str(&dados.body()).unwrap();
    assert!(v["tem"].is_null());
    assert_eq!(v["umi"].as_f64(), Some(50.0));
}

#[test]
fn successful_update_beeps_once() {
    let mut rig = Rig::new(22.0, 50.0);
    let c = rig
        .net
        .request("GET /set_limits?temp_min=5&temp_max=30&umi_min=20&umi_max=80");
    rig.tick();
    assert_eq!(rig.hw.beeps(), vec![200]);
    assert_eq!(
        rig.sink.count(|e| matches!(
            e,
            AppEvent::CalibrationUpdated {
                kind: CalibrationKind::Thresholds,
                ..
            }
        )),
        1
    );
    assert!(c.released());
}

#[test]
fn malformed_update_is_silent_but_confirmed() {
    let mut rig = Rig::new(22.0, 50.0);
    let before = rig.app.calibration();
    let c = rig
        .net
        .request("GET /set_limits?temp_min=abc&temp_max=35&umi_min=30&umi_max=70");
    rig.tick();

    assert_eq!(c.body(), "Limites atualizados com sucesso");
    assert_eq!(rig.app.calibration(), before);
    assert!(rig.hw.beeps().is_empty());
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::CalibrationRejected { .. })),
        1
    );
}

#[test]
fn offline_station_keeps_monitoring() {
    let mut rig = Rig::offline(36.2, 50.0);
    rig.net.request("GET /dados");
    rig.tick();
    assert!(rig.app.alerts().alert);
    assert_eq!(rig.app.tick_count(), 1);
}

// ── Sensors ───────────────────────────────────────────────────

#[test]
fn sensor_failure_keeps_stale_values() {
    let mut rig = Rig::new(36.2, 50.0);
    rig.tick();
    rig.hw.fail_sensors(SensorError::I2cTimeout);
    rig.tick();
    rig.tick();

    let r = rig.app.latest_reading();
    assert!(!r.valid);
    assert_eq!(r.temperature_c, 36.2);
    assert!(rig.app.alerts().alert, "stale values still drive alerts");
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::SensorFault(SensorError::I2cTimeout))),
        1,
        "fault reported once per outage"
    );
}

// ── Buttons and screens ───────────────────────────────────────

#[test]
fn navigation_cycles_both_ways() {
    let mut rig = Rig::new(22.0, 50.0);
    rig.mailbox.post(InputCommand::Previous);
    rig.tick();
    assert_eq!(rig.app.screen(), ScreenState::HumidityDetail);
    rig.mailbox.post(InputCommand::Next);
    rig.tick();
    assert_eq!(rig.app.screen(), ScreenState::Home);
}

#[test]
fn one_command_consumed_per_tick() {
    let mut rig = Rig::new(22.0, 50.0);
    assert!(rig.mailbox.post(InputCommand::Next));
    assert!(!rig.mailbox.post(InputCommand::Next));
    rig.tick();
    rig.tick();
    assert_eq!(rig.app.screen(), ScreenState::Overview);
}

#[test]
fn debounced_presses_across_buttons_move_once() {
    let mut rig = Rig::new(22.0, 50.0);
    let buttons = ButtonInputHandler::new(1_000_000);

    assert!(buttons.on_edge(Button::B, 2_000_000, &rig.mailbox).is_some());
    assert!(buttons.on_edge(Button::A, 2_400_000, &rig.mailbox).is_none());
    rig.tick();
    assert_eq!(rig.app.screen(), ScreenState::Overview);

    assert!(buttons.on_edge(Button::A, 3_000_001, &rig.mailbox).is_some());
    rig.tick();
    assert_eq!(rig.app.screen(), ScreenState::Home);
}

#[test]
fn joystick_hands_off_to_bootloader() {
    let mut rig = Rig::new(22.0, 50.0);
    rig.mailbox.post(InputCommand::FactoryReset);
    rig.tick();
    assert!(rig.hw.calls.contains(&ActuatorCall::EnterBootloader));
    assert_eq!(rig.app.screen(), ScreenState::Home);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::FactoryResetRequested)),
        1
    );
}

// ── Network status and telemetry ──────────────────────────────

#[test]
fn network_status_drives_led_and_home_screen() {
    let mut rig = Rig::new(22.0, 50.0);
    assert!(rig.hw.last_frame().contains_text("Iniciando..."));

    rig.app
        .set_network_status(NetworkStatus::Connecting, None, &mut rig.hw, &mut rig.sink);
    assert!(rig.hw.last_frame().contains_text("Conectando..."));

    let ip = Ipv4Addr::new(10, 0, 0, 7);
    rig.app
        .set_network_status(NetworkStatus::Connected, Some(ip), &mut rig.hw, &mut rig.sink);
    assert!(rig.hw.last_frame().contains_text("Conectado!"));
    assert!(rig.hw.last_frame().contains_text("10.0.0.7"));
    assert_eq!(
        rig.hw.calls.last(),
        Some(&ActuatorCall::NetworkLed(NetworkStatus::Connected))
    );
}

#[test]
fn telemetry_every_configured_ticks() {
    let mut rig = Rig::new(22.0, 50.0);
    for _ in 0..25 {
        rig.tick();
    }
    let telem = rig.sink.count(|e| matches!(e, AppEvent::Telemetry(_)));
    assert_eq!(telem, 2);
}
