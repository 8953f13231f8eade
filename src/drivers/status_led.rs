//! RGB network status LED.
//!
//! Three LEDC PWM channels (CH2-4) drive a common-cathode RGB LED that
//! mirrors Wi-Fi bring-up:
//!
//! | Status       | Colour |
//! |--------------|--------|
//! | `NotStarted` | blue   |
//! | `Connecting` | yellow |
//! | `Failed`     | red    |
//! | `Connected`  | green  |
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives three LEDC PWM channels via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::net::NetworkStatus;

pub const fn colour_for(status: NetworkStatus) -> (u8, u8, u8) {
    match status {
        NetworkStatus::NotStarted => (0, 0, 255),
        NetworkStatus::Connecting => (255, 255, 0),
        NetworkStatus::Failed => (255, 0, 0),
        NetworkStatus::Connected => (0, 255, 0),
    }
}

pub struct StatusLed {
    current: (u8, u8, u8),
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLed {
    pub fn new() -> Self {
        Self { current: (0, 0, 0) }
    }

    pub fn show(&mut self, status: NetworkStatus) {
        let (r, g, b) = colour_for(status);
        self.set_colour(r, g, b);
    }

    pub fn set_colour(&mut self, r: u8, g: u8, b: u8) {
        hw_init::ledc_set(hw_init::LEDC_CH_LED_R, r);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_G, g);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_B, b);
        self.current = (r, g, b);
    }

    pub fn current_colour(&self) -> (u8, u8, u8) {
        self.current
    }
}
