//! Pure screen rendering.
//!
//! [`render`] turns the loop's current state into a [`Frame`]: a short list
//! of text runs and horizontal rules on a 128×64 canvas.  It performs no I/O
//! and is idempotent, so the display adapter can redraw it every tick.
//! Every screen also gets the outer border, drawn by the adapter.

use core::fmt::Write;
use std::net::Ipv4Addr;

use heapless::{String, Vec};

use crate::alerts::{AlertStatus, Level};
use crate::calibration::{CalibratedReading, CalibrationConfig};
use crate::net::NetworkStatus;
use crate::ui::ScreenState;

/// Longest text run a 6 px font fits between the borders.
pub const MAX_TEXT: usize = 24;
const MAX_ELEMENTS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Top-left anchored text.
    Text { x: i32, y: i32, text: String<MAX_TEXT> },
    /// Full-width horizontal rule inside the border.
    Rule { y: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    elements: Vec<Element, MAX_ELEMENTS>,
}

impl Frame {
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// All text runs, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            Element::Rule { .. } => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    fn text(&mut self, x: i32, y: i32, args: core::fmt::Arguments<'_>) {
        let mut text = String::new();
        // Overflow truncates at the failing chunk.
        let _ = text.write_fmt(args);
        let _ = self.elements.push(Element::Text { x, y, text });
    }

    fn label(&mut self, x: i32, y: i32, s: &str) {
        self.text(x, y, format_args!("{s}"));
    }

    fn rule(&mut self, y: i32) {
        let _ = self.elements.push(Element::Rule { y });
    }
}

/// Everything a screen may show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenInputs {
    pub screen: ScreenState,
    pub reading: CalibratedReading,
    pub calibration: CalibrationConfig,
    pub alerts: AlertStatus,
    pub network: NetworkStatus,
    pub ip: Option<Ipv4Addr>,
}

pub fn render(inputs: &ScreenInputs) -> Frame {
    let mut f = Frame::default();
    match inputs.screen {
        ScreenState::Home => home(&mut f, inputs.network, inputs.ip),
        ScreenState::Overview => overview(&mut f, &inputs.reading),
        ScreenState::TemperatureDetail => detail(
            &mut f,
            Detail {
                title: ("TEMPERATURA", 20),
                unit: "C",
                symbol: 'T',
                current: inputs.reading.temperature_c,
                min: inputs.calibration.temp_min,
                max: inputs.calibration.temp_max,
                level: inputs.alerts.temperature(),
            },
        ),
        ScreenState::HumidityDetail => detail(
            &mut f,
            Detail {
                title: ("UMIDADE", 36),
                unit: "%",
                symbol: 'U',
                current: inputs.reading.humidity_pct,
                min: inputs.calibration.humid_min,
                max: inputs.calibration.humid_max,
                level: inputs.alerts.humidity(),
            },
        ),
    }
    f
}

fn home(f: &mut Frame, network: NetworkStatus, ip: Option<Ipv4Addr>) {
    f.label(20, 3, "EMB ESTACAO");
    f.label(12, 12, "METEOROLOGICA");
    f.rule(21);
    f.label(8, 23, "Conexao Wi-Fi:");
    let (x, status) = match network {
        NetworkStatus::NotStarted => (16, "Iniciando..."),
        NetworkStatus::Connecting => (12, "Conectando..."),
        NetworkStatus::Failed => (40, "Falha!"),
        NetworkStatus::Connected => (24, "Conectado!"),
    };
    f.label(x, 32, status);
    f.rule(41);
    f.label(8, 43, "IP Web Server:");
    match ip {
        Some(ip) => f.text(16, 52, format_args!("{ip}")),
        None => f.label(16, 52, "---"),
    }
}

fn overview(f: &mut Frame, r: &CalibratedReading) {
    f.label(4, 3, "Dados do local:");
    f.rule(12);
    f.label(4, 15, "Tem:");
    f.text(40, 15, format_args!("{:.1}C", r.temperature_c));
    f.rule(25);
    f.label(4, 28, "Pre:");
    f.text(40, 28, format_args!("{:.2}kPa", r.pressure_kpa));
    f.rule(38);
    f.label(4, 41, "Alt:");
    f.text(40, 41, format_args!("{:.0}m", r.altitude_m));
    f.rule(51);
    f.label(4, 53, "Umi:");
    f.text(40, 53, format_args!("{:.1}%", r.humidity_pct));
}

struct Detail {
    title: (&'static str, i32),
    unit: &'static str,
    symbol: char,
    current: f32,
    min: f32,
    max: f32,
    level: Level,
}

fn detail(f: &mut Frame, d: Detail) {
    f.label(d.title.1, 3, d.title.0);
    f.rule(12);
    f.label(4, 15, "Atual:");
    f.text(56, 15, format_args!("{:.1}{}", d.current, d.unit));
    f.rule(25);
    f.label(4, 28, "Min:");
    f.text(40, 28, format_args!("{:.1}{}", d.min, d.unit));
    f.rule(38);
    f.label(4, 41, "Max:");
    f.text(40, 41, format_args!("{:.1}{}", d.max, d.unit));
    f.rule(51);
    match d.level {
        Level::AboveMax => f.text(2, 53, format_args!("Alerta: {} > Max", d.symbol)),
        Level::BelowMin => f.text(2, 53, format_args!("Alerta: {} < Min", d.symbol)),
        Level::Normal => f.label(24, 53, "Status: Ok"),
    }
}
