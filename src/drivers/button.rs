//! ISR-debounced navigation buttons.
//!
//! ## Hardware
//!
//! Three active-low momentary switches with pull-ups.  Each GPIO fires on
//! the falling edge and its ISR calls [`ButtonInputHandler::on_edge`] with
//! the current `esp_timer` time truncated to `u32` microseconds.
//!
//! ## Debounce
//!
//! One timestamp is shared by all three buttons: an edge is accepted only if
//! more than `debounce_us` has passed since the last accepted edge of *any*
//! button.  The timestamp starts at zero, so edges during the first debounce
//! window after boot are ignored as well.
//!
//! | Button | Command        |
//! |--------|----------------|
//! | A      | `Previous`     |
//! | B      | `Next`         |
//! | J      | `FactoryReset` |

use core::sync::atomic::{AtomicU32, Ordering};

use crate::app::commands::InputCommand;
use crate::events::CommandMailbox;

pub const DEFAULT_DEBOUNCE_US: u32 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    A,
    B,
    J,
}

impl Button {
    pub const fn command(self) -> InputCommand {
        match self {
            Self::A => InputCommand::Previous,
            Self::B => InputCommand::Next,
            Self::J => InputCommand::FactoryReset,
        }
    }
}

pub struct ButtonInputHandler {
    last_accepted_us: AtomicU32,
    debounce_us: AtomicU32,
}

/// Instance used by the GPIO ISRs.
pub static BUTTONS: ButtonInputHandler = ButtonInputHandler::new(DEFAULT_DEBOUNCE_US);

impl ButtonInputHandler {
    pub const fn new(debounce_us: u32) -> Self {
        Self {
            last_accepted_us: AtomicU32::new(0),
            debounce_us: AtomicU32::new(debounce_us),
        }
    }

    /// Change the window.  Call before interrupts are enabled.
    pub fn set_debounce_us(&self, debounce_us: u32) {
        self.debounce_us.store(debounce_us, Ordering::Relaxed);
    }

    /// ISR entry point.  Lock-free, allocation-free.
    ///
    /// Returns the command posted, or `None` if the edge was debounced or
    /// the mailbox still held an unconsumed command.  An accepted edge
    /// restarts the window even when its command is dropped.
    pub fn on_edge(&self, button: Button, now_us: u32, mailbox: &CommandMailbox) -> Option<InputCommand> {
        let last = self.last_accepted_us.load(Ordering::Acquire);
        if now_us.wrapping_sub(last) <= self.debounce_us.load(Ordering::Relaxed) {
            return None;
        }
        self.last_accepted_us.store(now_us, Ordering::Release);

        let cmd = button.command();
        mailbox.post(cmd).then_some(cmd)
    }
}
