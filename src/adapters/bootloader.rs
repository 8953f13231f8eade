//! Joystick factory-reset collaborator.
//!
//! On ESP-IDF the chip restarts; the ROM bootloader then takes over if the
//! boot strap is held.  On host/test the request is only logged.

use log::warn;

#[cfg(target_os = "espidf")]
pub fn enter_bootloader() {
    warn!("bootloader: restarting");
    // SAFETY: esp_restart never returns and has no preconditions.
    unsafe { esp_idf_svc::sys::esp_restart() }
}

#[cfg(not(target_os = "espidf"))]
pub fn enter_bootloader() {
    warn!("bootloader(sim): restart requested, ignored");
}
