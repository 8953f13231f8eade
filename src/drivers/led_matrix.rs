//! 5×5 WS2812 matrix showing the alert state.
//!
//! Frames are described row-major (`row 0` at the top) and serialised into
//! the strip's physical order, which snakes from the bottom-right corner:
//!
//! ```text
//!  row 0:  24 23 22 21 20
//!  row 1:  15 16 17 18 19
//!  row 2:  14 13 12 11 10
//!  row 3:   5  6  7  8  9
//!  row 4:   4  3  2  1  0
//! ```
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`RmtPixelSink`] clocks the GRB buffer out through an RMT
//! channel.  On host/test: [`RecordingSink`] keeps the last buffer.

pub const SIDE: usize = 5;
pub const PIXELS: usize = SIDE * SIDE;
/// Three bytes per pixel, green first.
pub const FRAME_BYTES: usize = PIXELS * 3;

/// Brightness used for both patterns.
const LEVEL: u8 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Self = Self { r: 0, g: 0, b: 0 };
    pub const ALERT: Self = Self { r: LEVEL, g: 0, b: 0 };
    pub const OK: Self = Self { r: 0, g: LEVEL, b: 0 };
}

type Mask = [[bool; SIDE]; SIDE];

/// Exclamation mark, column 2.
const ALERT_MASK: Mask = {
    let mut m = [[false; SIDE]; SIDE];
    m[0][2] = true;
    m[1][2] = true;
    m[2][2] = true;
    m[4][2] = true;
    m
};

/// Check mark.
const OK_MASK: Mask = {
    let mut m = [[false; SIDE]; SIDE];
    m[1][4] = true;
    m[2][3] = true;
    m[3][0] = true;
    m[3][2] = true;
    m[4][1] = true;
    m
};

/// Strip position of the pixel at column `x`, row `y`.
pub const fn pixel_index(x: usize, y: usize) -> usize {
    if y % 2 == 0 {
        PIXELS - 1 - (y * SIDE + x)
    } else {
        PIXELS - 1 - (y * SIDE + (SIDE - 1 - x))
    }
}

/// Row-major colour grid for the given alert state.
pub fn pattern(alert: bool) -> [[Rgb; SIDE]; SIDE] {
    let (mask, colour) = if alert {
        (&ALERT_MASK, Rgb::ALERT)
    } else {
        (&OK_MASK, Rgb::OK)
    };
    let mut grid = [[Rgb::OFF; SIDE]; SIDE];
    for (row, cells) in mask.iter().enumerate() {
        for (col, &lit) in cells.iter().enumerate() {
            if lit {
                grid[row][col] = colour;
            }
        }
    }
    grid
}

/// Serialise a grid into wire order.
pub fn encode_grb(grid: &[[Rgb; SIDE]; SIDE]) -> [u8; FRAME_BYTES] {
    let mut out = [0u8; FRAME_BYTES];
    for (row, cells) in grid.iter().enumerate() {
        for (col, px) in cells.iter().enumerate() {
            let i = pixel_index(col, row) * 3;
            out[i] = px.g;
            out[i + 1] = px.r;
            out[i + 2] = px.b;
        }
    }
    out
}

/// Anything that can latch a full GRB frame onto the strip.
pub trait PixelSink {
    fn write_grb(&mut self, frame: &[u8; FRAME_BYTES]);
}

pub struct LedMatrix<P> {
    sink: P,
    shown: Option<bool>,
}

impl<P: PixelSink> LedMatrix<P> {
    pub fn new(sink: P) -> Self {
        Self { sink, shown: None }
    }

    /// Push the alert or ok pattern.  Rewritten every call so a glitched
    /// strip recovers on the next tick.
    pub fn show(&mut self, alert: bool) {
        if self.shown != Some(alert) {
            log::debug!("led_matrix: {}", if alert { "alert" } else { "ok" });
        }
        self.sink.write_grb(&encode_grb(&pattern(alert)));
        self.shown = Some(alert);
    }

    pub fn shown(&self) -> Option<bool> {
        self.shown
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }
}

// ── Host sink ─────────────────────────────────────────────────

/// Keeps the most recent frame and a write counter.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub last: Option<[u8; FRAME_BYTES]>,
    pub writes: u32,
}

impl PixelSink for RecordingSink {
    fn write_grb(&mut self, frame: &[u8; FRAME_BYTES]) {
        self.last = Some(*frame);
        self.writes += 1;
    }
}

// ── RMT sink ──────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use rmt::RmtPixelSink;

#[cfg(target_os = "espidf")]
mod rmt {
    use core::time::Duration;

    use esp_idf_hal::gpio::OutputPin;
    use esp_idf_hal::peripheral::Peripheral;
    use esp_idf_hal::rmt::config::TransmitConfig;
    use esp_idf_hal::rmt::{PinState, Pulse, RmtChannel, TxRmtDriver, VariableLengthSignal};
    use esp_idf_svc::sys::EspError;
    use log::warn;

    use super::{FRAME_BYTES, PixelSink};

    /// WS2812 bit timings at the RMT counter clock.
    pub struct RmtPixelSink<'d> {
        tx: TxRmtDriver<'d>,
        zero: (Pulse, Pulse),
        one: (Pulse, Pulse),
    }

    impl<'d> RmtPixelSink<'d> {
        pub fn new<C: RmtChannel>(
            channel: impl Peripheral<P = C> + 'd,
            pin: impl Peripheral<P = impl OutputPin> + 'd,
        ) -> Result<Self, EspError> {
            let config = TransmitConfig::new().clock_divider(1);
            let tx = TxRmtDriver::new(channel, pin, &config)?;
            let hz = tx.counter_clock()?;
            let ns = Duration::from_nanos;
            Ok(Self {
                zero: (
                    Pulse::new_with_duration(hz, PinState::High, &ns(350))?,
                    Pulse::new_with_duration(hz, PinState::Low, &ns(800))?,
                ),
                one: (
                    Pulse::new_with_duration(hz, PinState::High, &ns(700))?,
                    Pulse::new_with_duration(hz, PinState::Low, &ns(600))?,
                ),
                tx,
            })
        }

        fn transmit(&mut self, frame: &[u8; FRAME_BYTES]) -> Result<(), EspError> {
            let mut signal = VariableLengthSignal::with_capacity(FRAME_BYTES * 8);
            for byte in frame {
                for bit in (0..8).rev() {
                    let (high, low) = if byte & (1 << bit) != 0 {
                        &self.one
                    } else {
                        &self.zero
                    };
                    signal.push([high, low])?;
                }
            }
            self.tx.start_blocking(&signal)
        }
    }

    impl PixelSink for RmtPixelSink<'_> {
        fn write_grb(&mut self, frame: &[u8; FRAME_BYTES]) {
            if let Err(e) = self.transmit(frame) {
                warn!("led_matrix: RMT write failed: {}", e);
            }
        }
    }
}
