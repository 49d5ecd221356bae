//! Base tick timer using ESP-IDF's esp_timer API.
//!
//! A single periodic timer counts elapsed base ticks into an atomic.  The
//! main loop drains the counter with [`take_pending_ticks`] and feeds the
//! elapsed time into the cooperative scheduler, so no sensor work ever
//! runs in the timer context.
//!
//! On simulation targets the counter is advanced by [`sim_advance_ticks`].

use core::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(feature = "espidf")]
use log::info;

/// Base tick period (ms).  Finest sampling period the scheduler resolves.
pub const BASE_TICK_MS: u32 = 10;

static PENDING_TICKS: AtomicU32 = AtomicU32::new(0);

#[cfg(feature = "espidf")]
static mut BASE_TIMER: esp_timer_handle_t = core::ptr::null_mut();

/// SAFETY: BASE_TIMER is written once in `start_timer()` before any
/// timer callback fires.  Only called from the single main task.
#[cfg(feature = "espidf")]
unsafe fn base_timer() -> esp_timer_handle_t {
    unsafe { BASE_TIMER }
}

#[cfg(feature = "espidf")]
unsafe extern "C" fn base_tick_cb(_arg: *mut core::ffi::c_void) {
    PENDING_TICKS.fetch_add(1, Ordering::Release);
}

/// Start the base tick timer.
#[cfg(feature = "espidf")]
pub fn start_timer() {
    // SAFETY: BASE_TIMER is written here once at boot from the main task
    // before the callback can fire.  The callback only touches an atomic.
    unsafe {
        let args = esp_timer_create_args_t {
            callback: Some(base_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: c"base_tick".as_ptr(),
            skip_unhandled_events: false,
        };
        let ret = esp_timer_create(&args, &raw mut BASE_TIMER);
        if ret != ESP_OK {
            log::error!("hw_timer: base timer create failed (rc={}), no ticks will arrive", ret);
            return;
        }
        let ret = esp_timer_start_periodic(base_timer(), u64::from(BASE_TICK_MS) * 1_000);
        if ret != ESP_OK {
            log::error!("hw_timer: base timer start failed (rc={})", ret);
            return;
        }
    }
    info!("hw_timer: base tick @{}ms started", BASE_TICK_MS);
}

#[cfg(not(feature = "espidf"))]
pub fn start_timer() {
    log::info!("hw_timer(sim): timer not started (ticks driven by sim_advance_ticks)");
}

/// Stop the base tick timer.
#[cfg(feature = "espidf")]
pub fn stop_timer() {
    // SAFETY: base_timer() contract; null-check covers a failed start.
    unsafe {
        let t = base_timer();
        if !t.is_null() {
            esp_timer_stop(t);
        }
    }
}

#[cfg(not(feature = "espidf"))]
pub fn stop_timer() {}

/// Drain the pending tick count.
pub fn take_pending_ticks() -> u32 {
    PENDING_TICKS.swap(0, Ordering::AcqRel)
}

/// Drain the pending ticks and convert them to elapsed milliseconds.
pub fn take_elapsed_ms() -> u32 {
    take_pending_ticks().saturating_mul(BASE_TICK_MS)
}

#[cfg(not(feature = "espidf"))]
pub fn sim_advance_ticks(ticks: u32) {
    PENDING_TICKS.fetch_add(ticks, Ordering::Release);
}
