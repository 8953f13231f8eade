//! GPIO / peripheral pin assignments for the weather station board.
//!
//! Pins driven through raw ESP-IDF calls live here.  The I2C buses
//! (GPIO8/9 sensors, GPIO14/15 OLED) and the LED matrix (GPIO7, RMT 0) are
//! typed HAL peripherals and are picked in `main`.

// ---------------------------------------------------------------------------
// Environmental sensors (BMP280 + AHT20 share I2C0)
// ---------------------------------------------------------------------------

/// 100 kHz keeps both sensors inside their datasheet limits.
pub const SENSOR_I2C_BAUD_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// SSD1306 128×64 OLED (I2C1)
// ---------------------------------------------------------------------------

pub const DISPLAY_I2C_BAUD_HZ: u32 = 400_000;
pub const DISPLAY_WIDTH: u32 = 128;
pub const DISPLAY_HEIGHT: u32 = 64;

// ---------------------------------------------------------------------------
// Buzzers (two piezo transducers driven in parallel)
// ---------------------------------------------------------------------------

pub const BUZZER_A_GPIO: i32 = 21;
pub const BUZZER_B_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// Network status LED (discrete RGB, common cathode)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 11;
pub const LED_G_GPIO: i32 = 12;
pub const LED_B_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC frequency for RGB status LED (1 kHz).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;
/// Low duty keeps the piezo quiet enough for indoor use (~2.5 %).
pub const BUZZER_DUTY: u8 = 6;

// ---------------------------------------------------------------------------
// Navigation buttons (active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Button A: previous screen.
pub const BUTTON_A_GPIO: i32 = 5;
/// Button B: next screen.
pub const BUTTON_B_GPIO: i32 = 6;
/// Joystick push: reboot into the bootloader.
pub const BUTTON_J_GPIO: i32 = 4;
