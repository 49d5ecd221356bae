//! Port traits: the hexagonal boundary between the telemetry core and
//! the outside world.
//!
//! ```text
//!   RawSource ──▶ Sensor ──▶ PublishSink / AlarmSink
//!                   ▲
//!      TimerPort ───┘ (SchedulerDelegate routes ticks back in)
//! ```
//!
//! Physical drivers (potentiometer, probes, shaft pulse counter…)
//! implement [`RawSource`]; logging or telemetry links implement the
//! sinks.  The [`Sensor`](super::sensor::Sensor) never knows which
//! concrete variant is plugged in.

use crate::alarm::Alarm;
use crate::error::SchedulerError;
use crate::sample::{Reading, Sample};
use crate::scheduler::{ScheduleHandle, ScheduleId};

// ───────────────────────────────────────────────────────────────
// Raw source (driven adapter: hardware → core)
// ───────────────────────────────────────────────────────────────

/// One raw acquisition per call, in the sensor's sample kind.
///
/// Implementations must not block: they run inside the periodic
/// sampling callback and share the dispatch context with every other
/// schedule.
pub trait RawSource<S: Sample> {
    fn read(&mut self) -> S;
}

impl<S: Sample, F: FnMut() -> S> RawSource<S> for F {
    fn read(&mut self) -> S {
        self()
    }
}

// ───────────────────────────────────────────────────────────────
// Sinks (driven adapters: core → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// Receives periodic republished values.
pub trait PublishSink {
    fn publish(&mut self, name: &str, unit: &str, value: Reading);
}

/// Receives alarms raised from the sampling path.
pub trait AlarmSink {
    fn raise(&mut self, alarm: &Alarm);
}

/// Both halves at once, for schedule dispatch.
pub trait TelemetrySink: PublishSink + AlarmSink {}

impl<T: PublishSink + AlarmSink> TelemetrySink for T {}

/// Discards everything.  The default when no sink is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PublishSink for NullSink {
    fn publish(&mut self, _name: &str, _unit: &str, _value: Reading) {}
}

impl AlarmSink for NullSink {
    fn raise(&mut self, _alarm: &Alarm) {}
}

// ───────────────────────────────────────────────────────────────
// Timer facility
// ───────────────────────────────────────────────────────────────

/// Registers periodic callbacks.  The returned handle owns the
/// registration; dropping it cancels the schedule.
pub trait TimerPort {
    fn start_periodic(
        &mut self,
        label: &'static str,
        period_ms: u32,
    ) -> Result<ScheduleHandle, SchedulerError>;
}

/// Callback trait that the scheduler invokes when a schedule fires.
///
/// The application implements this by routing `id` to whichever sensor
/// owns the matching handle (see
/// [`Sensor::on_schedule_fired`](super::sensor::Sensor::on_schedule_fired)).
pub trait SchedulerDelegate {
    fn on_schedule_fired(&mut self, id: ScheduleId, label: &str);
}

// ───────────────────────────────────────────────────────────────
// Time
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.  Wraps at `u32::MAX`; compare with
/// `wrapping_sub`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}
