//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod button;
pub mod buzzer;
pub mod display;
pub mod hw_init;
pub mod hw_timer;
pub mod indicators;
pub mod led_matrix;
pub mod status_led;
