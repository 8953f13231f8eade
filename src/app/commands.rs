//! Inbound commands to the application service.
//!
//! Produced by the button ISRs and consumed once per tick by
//! [`StationService`](super::service::StationService).  They travel through
//! the single-slot [`CommandMailbox`](crate::events::CommandMailbox), so each
//! variant has a stable non-zero byte encoding.

/// Commands that local input can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InputCommand {
    /// Show the previous screen (button A).
    Previous = 1,
    /// Show the next screen (button B).
    Next = 2,
    /// Reboot into the bootloader (joystick push).
    FactoryReset = 3,
}

impl InputCommand {
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Previous),
            2 => Some(Self::Next),
            3 => Some(Self::FactoryReset),
            _ => None,
        }
    }
}
