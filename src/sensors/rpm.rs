//! Shaft speed from a hall-effect pulse input.
//!
//! The GPIO ISR calls [`PulseTimer::on_edge`] on every rising edge; it
//! only stores the edge time and the period since the previous edge, so
//! it never blocks.  [`RpmSource`] turns the latest period into a rate on
//! read:
//!
//! ```text
//!   rpm = 60000 / (period_ms × impulses_per_rotation)
//! ```
//!
//! A shaft that stops produces no more edges, so a reading whose last edge
//! is older than the stall timeout reports 0 rather than the last rate.
//!
//! Because the ISR and the main loop run at different priorities, the
//! shared state uses atomics; the timer is a `static` because ESP-IDF ISR
//! callbacks cannot capture closures.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::app::ports::{Clock, RawSource};

/// Default stall timeout: below ~30 RPM on a two-magnet shaft.
pub const DEFAULT_STALL_TIMEOUT_MS: u32 = 1_000;

/// Edge timing shared between the GPIO ISR and the sampling path.
pub struct PulseTimer {
    last_edge_ms: AtomicU32,
    period_ms: AtomicU32,
    seen_edge: AtomicBool,
}

/// Pulse timer for the propeller shaft input (see `pins::SHAFT_PULSE_GPIO`).
pub static SHAFT_PULSES: PulseTimer = PulseTimer::new();

impl Default for PulseTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseTimer {
    pub const fn new() -> Self {
        Self {
            last_edge_ms: AtomicU32::new(0),
            period_ms: AtomicU32::new(0),
            seen_edge: AtomicBool::new(false),
        }
    }

    /// Record a rising edge.  ISR-safe: lock-free, no allocation.
    ///
    /// Periods are stored with millisecond resolution and a floor of 1 ms,
    /// since 0 marks "no period yet".
    pub fn on_edge(&self, now_ms: u32) {
        let previous = self.last_edge_ms.swap(now_ms, Ordering::AcqRel);
        if self.seen_edge.swap(true, Ordering::AcqRel) {
            self.period_ms
                .store(now_ms.wrapping_sub(previous).max(1), Ordering::Release);
        }
    }

    /// Period between the two most recent edges; `None` until two edges
    /// have been seen.
    pub fn period_ms(&self) -> Option<u32> {
        match self.period_ms.load(Ordering::Acquire) {
            0 => None,
            p => Some(p),
        }
    }

    /// Time of the most recent edge; `None` before the first.
    pub fn last_edge_ms(&self) -> Option<u32> {
        self.seen_edge
            .load(Ordering::Acquire)
            .then(|| self.last_edge_ms.load(Ordering::Acquire))
    }

    pub fn reset(&self) {
        self.seen_edge.store(false, Ordering::Release);
        self.period_ms.store(0, Ordering::Release);
        self.last_edge_ms.store(0, Ordering::Release);
    }
}

/// Raw source reporting revolutions per minute.
pub struct RpmSource<'a, C: Clock> {
    timer: &'a PulseTimer,
    clock: C,
    impulses_per_rotation: u32,
    stall_timeout_ms: u32,
}

impl<'a, C: Clock> RpmSource<'a, C> {
    /// `impulses_per_rotation` of 0 is treated as 1.
    pub fn new(timer: &'a PulseTimer, clock: C, impulses_per_rotation: u32) -> Self {
        Self {
            timer,
            clock,
            impulses_per_rotation: impulses_per_rotation.max(1),
            stall_timeout_ms: DEFAULT_STALL_TIMEOUT_MS,
        }
    }

    #[must_use]
    pub fn with_stall_timeout(mut self, timeout_ms: u32) -> Self {
        self.stall_timeout_ms = timeout_ms;
        self
    }

    pub fn impulses_per_rotation(&self) -> u32 {
        self.impulses_per_rotation
    }
}

impl<C: Clock> RawSource<f32> for RpmSource<'_, C> {
    fn read(&mut self) -> f32 {
        let Some(last_edge) = self.timer.last_edge_ms() else {
            return 0.0;
        };
        if self.clock.now_ms().wrapping_sub(last_edge) > self.stall_timeout_ms {
            return 0.0;
        }
        let Some(period) = self.timer.period_ms() else {
            return 0.0;
        };
        60_000.0 / (period as f32 * self.impulses_per_rotation as f32)
    }
}
