//! One-shot beep timer using ESP-IDF's esp_timer API.
//!
//! The callback runs in the esp_timer task (not ISR) and only writes the
//! two buzzer LEDC duty registers.  On simulation targets nothing is
//! scheduled; [`BeepSchedule`](super::buzzer::BeepSchedule) still tracks
//! the deadline for tests.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
static mut BEEP_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: BEEP_TIMER is written once in `init_beep_timer()` before any
/// beep is armed.  Only called from the single main task.
#[cfg(target_os = "espidf")]
unsafe fn beep_timer() -> esp_timer_handle_t {
    unsafe { BEEP_TIMER }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn beep_stop_cb(_arg: *mut core::ffi::c_void) {
    super::buzzer::set_tone(false);
}

/// Create the beep timer.  Must run before the first `arm_beep_stop()`.
#[cfg(target_os = "espidf")]
pub fn init_beep_timer() {
    // SAFETY: BEEP_TIMER is written here once at boot from the main task,
    // before any callback can fire.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(beep_stop_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"beep".as_ptr(),
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&args, &raw mut BEEP_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: beep timer create failed (rc={}), beeps will not stop", ret);
            return;
        }
    }
    log::info!("hw_timer: beep timer ready");
}

#[cfg(not(target_os = "espidf"))]
pub fn init_beep_timer() {
    log::info!("hw_timer(sim): beep timer not created");
}

/// (Re)start the silence countdown.  A running countdown is cancelled first.
#[cfg(target_os = "espidf")]
pub fn arm_beep_stop(after_us: u64) {
    // SAFETY: beep_timer() contract; null-check covers a failed create.
    unsafe {
        let t = beep_timer();
        if t.is_null() {
            return;
        }
        // ESP_ERR_INVALID_STATE just means it was not running.
        esp_timer_stop(t);
        let ret = esp_timer_start_once(t, after_us);
        if ret != ESP_OK {
            log::warn!("hw_timer: beep start failed (rc={})", ret);
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn arm_beep_stop(_after_us: u64) {}
