//! Weather Station Firmware: Main Entry Point
//!
//! Hexagonal architecture around one cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          LogEventSink     HttpConfigServer    │
//! │  (Sensor+Actuator+Display) (EventSink)     (NetworkPort)       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │             StationService (pure logic)                │    │
//! │  │  Calibration · Alerts · Screens                        │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Button ISRs ──▶ CommandMailbox (the only async producer)      │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use esp_idf_hal::delay::{Delay, FreeRtos};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::prelude::*;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{info, warn};
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

use weatherstation::adapters::hardware::HardwareAdapter;
use weatherstation::adapters::log_sink::LogEventSink;
use weatherstation::adapters::wifi::{self, WifiCredentials};
use weatherstation::app::service::StationService;
use weatherstation::config::StationConfig;
use weatherstation::drivers::button::BUTTONS;
use weatherstation::drivers::display::OledDisplay;
use weatherstation::drivers::led_matrix::RmtPixelSink;
use weatherstation::drivers::{hw_init, hw_timer};
use weatherstation::events::INPUT_MAILBOX;
use weatherstation::net::NetworkStatus;
use weatherstation::net::http::HttpConfigServer;
use weatherstation::net::transport::TcpServerSocket;
use weatherstation::pins;
use weatherstation::sensors::I2cSensors;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Weather Station v{}                 ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = StationConfig::default();

    // ── 2. Raw peripherals: LEDC, buttons, beep timer ─────────
    hw_init::init_peripherals(config.buzzer_freq_hz).context("peripheral init")?;
    hw_timer::init_beep_timer();
    BUTTONS.set_debounce_us(config.debounce_us);
    if let Err(e) = hw_init::init_isr_service() {
        log::error!("ISR service init failed: {}, continuing without buttons", e);
    }

    // ── 3. HAL-owned peripherals ──────────────────────────────
    let peripherals = Peripherals::take().context("peripherals already taken")?;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = match EspDefaultNvsPartition::take() {
        Ok(nvs) => Some(nvs),
        Err(e) => {
            warn!("NVS unavailable ({}), WiFi starts without it", e);
            None
        }
    };

    // Sensors on I2C0 (GPIO8/9)
    let sensor_bus = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio8,
        peripherals.pins.gpio9,
        &I2cConfig::new().baudrate(pins::SENSOR_I2C_BAUD_HZ.Hz()),
    )?;
    let sensors = I2cSensors::new(sensor_bus, Delay::new_default());

    // OLED on I2C1 (GPIO14/15)
    let display_bus = I2cDriver::new(
        peripherals.i2c1,
        peripherals.pins.gpio14,
        peripherals.pins.gpio15,
        &I2cConfig::new().baudrate(pins::DISPLAY_I2C_BAUD_HZ.Hz()),
    )?;
    let mut panel = Ssd1306::new(
        I2CDisplayInterface::new(display_bus),
        DisplaySize128x64,
        DisplayRotation::Rotate0,
    )
    .into_buffered_graphics_mode();
    panel
        .init()
        .map_err(|e| anyhow::anyhow!("SSD1306 init failed: {:?}", e))?;

    // LED matrix on RMT channel 0 (GPIO7)
    let pixels = RmtPixelSink::new(peripherals.rmt.channel0, peripherals.pins.gpio7)?;

    // ── 4. Construct adapters + service ───────────────────────
    let mut hw = HardwareAdapter::new(sensors, pixels, OledDisplay::new(panel));
    let mut log_sink = LogEventSink::new();
    let mut app = StationService::new(config.clone());
    app.start(&mut hw, &mut log_sink);

    // ── 5. WiFi + HTTP server ─────────────────────────────────
    app.set_network_status(NetworkStatus::Connecting, None, &mut hw, &mut log_sink);
    let link = WifiCredentials::from_build_env()
        .and_then(|creds| wifi::connect(peripherals.modem, sys_loop, nvs, &creds));

    let (mut server, _link) = match link {
        Ok(link) => {
            app.set_network_status(
                NetworkStatus::Connected,
                Some(link.ip()),
                &mut hw,
                &mut log_sink,
            );
            let server = match TcpServerSocket::bind(config.http_port) {
                Ok(socket) => Some(HttpConfigServer::new(socket)),
                Err(e) => {
                    warn!("HTTP server unavailable: {}", e);
                    None
                }
            };
            (server, Some(link))
        }
        Err(e) => {
            warn!("WiFi bring-up failed: {}", e);
            app.set_network_status(NetworkStatus::Failed, None, &mut hw, &mut log_sink);
            if !config.run_without_network {
                anyhow::bail!("network required but unavailable: {}", e);
            }
            info!("Continuing without network");
            (None, None)
        }
    };

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        app.tick(&INPUT_MAILBOX, &mut server, &mut hw, &mut log_sink);
        FreeRtos::delay_ms(app.tick_interval_ms());
    }
}
