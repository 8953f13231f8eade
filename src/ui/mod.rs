//! Local user interface: the four-screen cycle and its rendering.
//!
//! ```text
//!        Next ─────────────────────────────────────────────▶
//!   Home ──▶ Overview ──▶ TemperatureDetail ──▶ HumidityDetail ──┐
//!    ▲                                                           │
//!    └───────────────────────────────────────────────────────────┘
//! ```

pub mod render;

/// Navigation direction carried by an accepted button edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Screen currently shown on the OLED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ScreenState {
    #[default]
    Home = 0,
    Overview = 1,
    TemperatureDetail = 2,
    HumidityDetail = 3,
}

const SCREEN_COUNT: u8 = 4;

impl ScreenState {
    const fn from_index(index: u8) -> Self {
        match index % SCREEN_COUNT {
            0 => Self::Home,
            1 => Self::Overview,
            2 => Self::TemperatureDetail,
            _ => Self::HumidityDetail,
        }
    }

    /// Modulo-4 step; no state is terminal.
    pub const fn advance(self, direction: Direction) -> Self {
        let i = self as u8;
        match direction {
            Direction::Next => Self::from_index(i + 1),
            Direction::Previous => Self::from_index(i + SCREEN_COUNT - 1),
        }
    }

    pub const fn next(self) -> Self {
        self.advance(Direction::Next)
    }

    pub const fn previous(self) -> Self {
        self.advance(Direction::Previous)
    }
}
