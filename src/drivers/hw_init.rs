//! One-shot hardware peripheral initialization.
//!
//! Configures the button inputs and the LEDC timers/channels for the
//! buzzers and the RGB status LED using raw ESP-IDF sys calls.  Called once
//! from `main()` before the control loop starts.  The I2C buses and the
//! RMT channel are owned by their `esp-idf-hal` drivers instead.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals(buzzer_freq_hz: u32) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_buttons()?;
        init_ledc(buzzer_freq_hz)?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(_buzzer_freq_hz: u32) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
fn check(ret: esp_err_t, err: fn(i32) -> HwInitError) -> Result<(), HwInitError> {
    if ret == ESP_OK { Ok(()) } else { Err(err(ret)) }
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
const BUTTON_PINS: [i32; 3] = [pins::BUTTON_A_GPIO, pins::BUTTON_B_GPIO, pins::BUTTON_J_GPIO];

#[cfg(target_os = "espidf")]
unsafe fn init_buttons() -> Result<(), HwInitError> {
    // Active-low with pull-ups: a press is a falling edge.
    for &pin in &BUTTON_PINS {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
        };
        check(unsafe { gpio_config(&cfg) }, HwInitError::GpioConfigFailed)?;
    }

    info!("hw_init: buttons A/B/J configured");
    Ok(())
}

// ── LEDC PWM ─────────────────────────────────────────────────

pub const LEDC_CH_BUZZER_A: u32 = 0;
pub const LEDC_CH_BUZZER_B: u32 = 1;
pub const LEDC_CH_LED_R: u32 = 2;
pub const LEDC_CH_LED_G: u32 = 3;
pub const LEDC_CH_LED_B: u32 = 4;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc(buzzer_freq_hz: u32) -> Result<(), HwInitError> {
    // Timer 0: buzzers (audible tone, 8-bit)
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: buzzer_freq_hz,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    check(unsafe { ledc_timer_config(&timer0) }, HwInitError::LedcInitFailed)?;

    // Timer 1: RGB LED (1 kHz, 8-bit)
    let timer1 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_1,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::LED_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    check(unsafe { ledc_timer_config(&timer1) }, HwInitError::LedcInitFailed)?;

    let channels = [
        (LEDC_CH_BUZZER_A, pins::BUZZER_A_GPIO, ledc_timer_t_LEDC_TIMER_0),
        (LEDC_CH_BUZZER_B, pins::BUZZER_B_GPIO, ledc_timer_t_LEDC_TIMER_0),
        (LEDC_CH_LED_R, pins::LED_R_GPIO, ledc_timer_t_LEDC_TIMER_1),
        (LEDC_CH_LED_G, pins::LED_G_GPIO, ledc_timer_t_LEDC_TIMER_1),
        (LEDC_CH_LED_B, pins::LED_B_GPIO, ledc_timer_t_LEDC_TIMER_1),
    ];
    for (channel, gpio, timer) in channels {
        let ret = unsafe {
            ledc_channel_config(&ledc_channel_config_t {
                speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
                channel,
                timer_sel: timer,
                gpio_num: gpio,
                duty: 0,
                hpoint: 0,
                ..Default::default()
            })
        };
        check(ret, HwInitError::LedcInitFailed)?;
    }

    info!("hw_init: LEDC configured (buzzer=CH0-1 @{}Hz, led=CH2-4)", buzzer_freq_hz);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) {
    // SAFETY: LEDC channels were configured in init_ledc().  Each call
    // writes one channel's duty register; the beep timer task only ever
    // touches the buzzer channels.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty));
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u8) {}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::drivers::button::{BUTTONS, Button};
#[cfg(target_os = "espidf")]
use crate::events::INPUT_MAILBOX;

#[cfg(target_os = "espidf")]
fn isr_now_us() -> u32 {
    // SAFETY: esp_timer_get_time is an RTC counter read; safe in ISR context.
    // Truncation is intended: debounce compares with wrapping arithmetic.
    (unsafe { esp_timer_get_time() }) as u32
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_a_isr(_arg: *mut core::ffi::c_void) {
    BUTTONS.on_edge(Button::A, isr_now_us(), &INPUT_MAILBOX);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_b_isr(_arg: *mut core::ffi::c_void) {
    BUTTONS.on_edge(Button::B, isr_now_us(), &INPUT_MAILBOX);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_j_isr(_arg: *mut core::ffi::c_void) {
    BUTTONS.on_edge(Button::J, isr_now_us(), &INPUT_MAILBOX);
}

/// Install per-pin GPIO ISR service and register the button handlers.
/// Call after init_peripherals() and before the control loop.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    type Isr = unsafe extern "C" fn(*mut core::ffi::c_void);
    let handlers: [(i32, Isr); 3] = [
        (pins::BUTTON_A_GPIO, button_a_isr),
        (pins::BUTTON_B_GPIO, button_b_isr),
        (pins::BUTTON_J_GPIO, button_j_isr),
    ];

    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable).  The handlers only touch
    // atomics.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        for (pin, isr) in handlers {
            gpio_set_intr_type(pin, gpio_int_type_t_GPIO_INTR_NEGEDGE);
            let ret = gpio_isr_handler_add(pin, Some(isr), core::ptr::null_mut());
            if ret != ESP_OK {
                return Err(HwInitError::IsrInstallFailed(ret));
            }
            gpio_intr_enable(pin);
        }
    }
    info!("hw_init: ISR service installed (buttons A, B, J)");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
