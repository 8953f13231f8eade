//! Interrupt-to-loop command hand-off.
//!
//! The button ISRs are the only truly asynchronous producers in the system.
//! They post into a single-slot mailbox; the control loop takes at most one
//! command at the top of every tick.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Button A/B  │────▶│   Mailbox    │────▶│  Main Loop   │
//! │ Joystick J  │────▶│ (1 slot, u8) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

use crate::app::commands::InputCommand;

const EMPTY: u8 = 0;

/// Lock-free single-slot mailbox.  Never blocks, never allocates.
pub struct CommandMailbox {
    slot: AtomicU8,
}

/// Mailbox shared by the GPIO ISRs and the main loop.
pub static INPUT_MAILBOX: CommandMailbox = CommandMailbox::new();

impl CommandMailbox {
    pub const fn new() -> Self {
        Self {
            slot: AtomicU8::new(EMPTY),
        }
    }

    /// Post a command.  Safe to call from ISR context.
    /// Returns `false` if a command is already pending (new one dropped).
    pub fn post(&self, cmd: InputCommand) -> bool {
        self.slot
            .compare_exchange(EMPTY, cmd.code(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Take the pending command, leaving the slot empty.
    pub fn take(&self) -> Option<InputCommand> {
        InputCommand::from_code(self.slot.swap(EMPTY, Ordering::AcqRel))
    }

    pub fn is_empty(&self) -> bool {
        self.slot.load(Ordering::Acquire) == EMPTY
    }
}

impl Default for CommandMailbox {
    fn default() -> Self {
        Self::new()
    }
}
