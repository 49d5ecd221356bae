//! Cooperative periodic scheduler.
//!
//! Stands in for the MCU timer facility: a hardware tick source (see
//! [`crate::drivers::hw_timer`]) only counts elapsed ticks, and the main
//! loop feeds the elapsed time into [`TickScheduler::tick`].  Due
//! schedules are reported one at a time to a [`SchedulerDelegate`], so
//! every callback runs to completion before the next one is serviced.
//!
//! ```text
//! ┌────────────┐  ticks  ┌───────────────┐ on_schedule_fired ┌────────────┐
//! │ esp_timer  │───────▶│ TickScheduler │──────────────────▶│  Delegate  │
//! │ (counter)  │         │  slots[16]    │                   │ → Sensors  │
//! └────────────┘         └───────────────┘                   └────────────┘
//!                               ▲
//!                               │ start_periodic() → ScheduleHandle
//!                          Sensor::start_reading / start_broadcasting
//! ```
//!
//! Registration hands out an owned [`ScheduleHandle`].  Dropping the
//! handle disarms its slot, so a sensor that stops (or is dropped) never
//! leaves a periodic callback behind.

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};

use crate::app::ports::{SchedulerDelegate, TimerPort};
use crate::error::SchedulerError;

/// Maximum number of concurrent schedules (stack-allocated).
pub const MAX_SCHEDULES: usize = 16;

/// Convert a sampling frequency into a whole-millisecond period (≥ 1 ms).
pub fn period_from_hz(hz: f32) -> u32 {
    if !hz.is_finite() || hz <= 0.0 {
        return 0;
    }
    (1000.0 / hz).round().max(1.0) as u32
}

/// Identifies one registration for the lifetime of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleId(u32);

impl ScheduleId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Owned registration.  Not `Clone`: exactly one owner may cancel it.
#[derive(Debug)]
pub struct ScheduleHandle {
    id: ScheduleId,
    armed: Arc<AtomicBool>,
}

impl ScheduleHandle {
    pub fn id(&self) -> ScheduleId {
        self.id
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }
}

impl Drop for ScheduleHandle {
    fn drop(&mut self) {
        self.armed.store(false, Ordering::Release);
    }
}

/// Internal bookkeeping for a live schedule.
#[derive(Debug)]
struct ScheduleEntry {
    id: ScheduleId,
    label: &'static str,
    period_ms: u32,
    elapsed_ms: u32,
    armed: Arc<AtomicBool>,
}

/// The scheduler engine.
pub struct TickScheduler {
    entries: heapless::Vec<ScheduleEntry, MAX_SCHEDULES>,
    next_id: u32,
    enabled: bool,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler {
    pub fn new() -> Self {
        Self {
            entries: heapless::Vec::new(),
            next_id: 0,
            enabled: true,
        }
    }

    /// Enable or disable the entire scheduler.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Advance every armed schedule by `elapsed_ms`.
    ///
    /// Each due schedule fires once per call; periods missed during a
    /// long stall are coalesced rather than replayed back to back.
    pub fn tick(&mut self, elapsed_ms: u32, delegate: &mut dyn SchedulerDelegate) {
        self.reclaim();
        if !self.enabled {
            return;
        }

        for entry in self.entries.iter_mut() {
            // A delegate may have dropped a handle earlier in this pass.
            if !entry.armed.load(Ordering::Acquire) {
                continue;
            }

            entry.elapsed_ms = entry.elapsed_ms.saturating_add(elapsed_ms);
            if entry.elapsed_ms < entry.period_ms {
                continue;
            }

            let missed = entry.elapsed_ms / entry.period_ms - 1;
            if missed > 0 {
                debug!(
                    "Scheduler: '{}' #{} coalesced {} missed period(s)",
                    entry.label, entry.id.0, missed
                );
            }
            entry.elapsed_ms %= entry.period_ms;
            delegate.on_schedule_fired(entry.id, entry.label);
        }
    }

    /// Number of armed schedules.
    pub fn active_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.armed.load(Ordering::Acquire))
            .count()
    }

    /// Drop slots whose handles have been released.
    fn reclaim(&mut self) {
        self.entries.retain(|e| {
            let armed = e.armed.load(Ordering::Acquire);
            if !armed {
                info!("Scheduler: released '{}' #{}", e.label, e.id.0);
            }
            armed
        });
    }
}

impl TimerPort for TickScheduler {
    fn start_periodic(
        &mut self,
        label: &'static str,
        period_ms: u32,
    ) -> Result<ScheduleHandle, SchedulerError> {
        if period_ms == 0 {
            return Err(SchedulerError::InvalidPeriod);
        }
        self.reclaim();

        let id = ScheduleId(self.next_id);
        let armed = Arc::new(AtomicBool::new(true));
        self.entries
            .push(ScheduleEntry {
                id,
                label,
                period_ms,
                elapsed_ms: 0,
                armed: Arc::clone(&armed),
            })
            .map_err(|_| SchedulerError::Full)?;
        self.next_id = self.next_id.wrapping_add(1);

        info!("Scheduler: added '{}' #{} every {}ms", label, id.0, period_ms);
        Ok(ScheduleHandle { id, armed })
    }
}
