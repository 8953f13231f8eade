//! 128×64 monochrome OLED.
//!
//! [`draw_frame`] rasterises a [`Frame`] onto any `embedded-graphics` target:
//! the one-pixel outer border, every rule, then every text run in
//! `FONT_6X10` anchored at its top-left corner.  [`OledDisplay`] wraps a
//! [`Panel`] and redraws the whole buffer on each render.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: the SSD1306 buffered graphics mode implements [`Panel`].
//! On host/test: [`Canvas`] is an in-memory framebuffer.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use log::warn;

use crate::app::ports::DisplayPort;
use crate::pins::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::ui::render::{Element, Frame};

/// Draw `frame` onto `target`.  Does not clear or flush.
pub fn draw_frame<D>(frame: &Frame, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    let font = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

    Rectangle::new(Point::zero(), Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT))
        .into_styled(stroke)
        .draw(target)?;

    let right = DISPLAY_WIDTH as i32 - 2;
    for element in frame.elements() {
        match element {
            Element::Rule { y } => {
                Line::new(Point::new(1, *y), Point::new(right, *y))
                    .into_styled(stroke)
                    .draw(target)?;
            }
            Element::Text { x, y, text } => {
                Text::with_baseline(text, Point::new(*x, *y), font, Baseline::Top).draw(target)?;
            }
        }
    }
    Ok(())
}

/// A draw target backed by a buffer that must be pushed to the glass.
pub trait Panel: DrawTarget<Color = BinaryColor> {
    fn present(&mut self) -> Result<(), &'static str>;
}

pub struct OledDisplay<P> {
    panel: P,
    frames: u32,
}

impl<P: Panel> OledDisplay<P>
where
    P::Error: core::fmt::Debug,
{
    pub fn new(panel: P) -> Self {
        Self { panel, frames: 0 }
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Frames pushed so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

impl<P: Panel> DisplayPort for OledDisplay<P>
where
    P::Error: core::fmt::Debug,
{
    fn render(&mut self, frame: &Frame) {
        if let Err(e) = self.panel.clear(BinaryColor::Off) {
            warn!("display: clear failed: {:?}", e);
            return;
        }
        if let Err(e) = draw_frame(frame, &mut self.panel) {
            warn!("display: draw failed: {:?}", e);
            return;
        }
        match self.panel.present() {
            Ok(()) => self.frames = self.frames.wrapping_add(1),
            Err(e) => warn!("display: {}", e),
        }
    }
}

// ── Host canvas ───────────────────────────────────────────────

const W: usize = DISPLAY_WIDTH as usize;
const H: usize = DISPLAY_HEIGHT as usize;

/// In-memory 128×64 framebuffer.
#[derive(Clone)]
pub struct Canvas {
    pixels: [[bool; W]; H],
    presented: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            pixels: [[false; W]; H],
            presented: 0,
        }
    }
}

impl Canvas {
    pub fn is_on(&self, x: usize, y: usize) -> bool {
        self.pixels.get(y).and_then(|row| row.get(x)).copied().unwrap_or(false)
    }

    /// Lit pixels inside the given rectangle.
    pub fn lit_in(&self, x: usize, y: usize, w: usize, h: usize) -> usize {
        (y..(y + h).min(H))
            .flat_map(|row| (x..(x + w).min(W)).map(move |col| (col, row)))
            .filter(|&(col, row)| self.pixels[row][col])
            .count()
    }

    pub fn presented(&self) -> u32 {
        self.presented
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

impl DrawTarget for Canvas {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, colour) in pixels {
            if let (Ok(x), Ok(y)) = (usize::try_from(p.x), usize::try_from(p.y)) {
                if x < W && y < H {
                    self.pixels[y][x] = colour.is_on();
                }
            }
        }
        Ok(())
    }
}

impl Panel for Canvas {
    fn present(&mut self) -> Result<(), &'static str> {
        self.presented += 1;
        Ok(())
    }
}

// ── SSD1306 panel ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod ssd1306_panel {
    use ssd1306::mode::BufferedGraphicsMode;
    use ssd1306::prelude::*;
    use ssd1306::Ssd1306;

    use super::Panel;

    impl<DI, SIZE> Panel for Ssd1306<DI, SIZE, BufferedGraphicsMode<SIZE>>
    where
        DI: WriteOnlyDataCommand,
        SIZE: DisplaySize,
    {
        fn present(&mut self) -> Result<(), &'static str> {
            self.flush().map_err(|_| "SSD1306 flush failed")
        }
    }
}
