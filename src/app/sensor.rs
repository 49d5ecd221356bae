//! Sensor orchestrator.
//!
//! [`Sensor`] owns one [`BoundedHistoryBuffer`] (absent when history is
//! disabled), one [`CalibrationTracker`] and one [`AlarmEvaluator`], and
//! pulls raw values from an injected [`RawSource`].  Every variant
//! (potentiometer, temperature probe, shaft RPM, power…) is the same
//! `Sensor` with a different source plugged in.
//!
//! ```text
//!  tick ─▶ RawSource::read ─▶ tracker.observe ─▶ extrema ─▶ history.put ─▶ alarms.evaluate
//!                                                                               │
//!                                            AlarmStatus returned ◀─────────────┘
//!                                            (and forwarded to AlarmSink on dispatch)
//! ```
//!
//! ## States
//!
//! Sampling is `Idle` or `Reading`; broadcasting is an independent flag
//! and may run in either sampling state, republishing the last cached
//! value.  Each active schedule is held as an owned [`ScheduleHandle`]:
//! stopping drops it, and so does dropping the sensor.

use log::{debug, info};

use crate::alarm::{AlarmEvaluator, AlarmStatus};
use crate::calibration::CalibrationTracker;
use crate::config::SensorConfig;
use crate::error::{ConfigError, Error, SchedulerError, TelemetryError};
use crate::history::BoundedHistoryBuffer;
use crate::sample::Sample;
use crate::scheduler::{ScheduleHandle, ScheduleId, period_from_hz};

use super::ports::{PublishSink, RawSource, TelemetrySink, TimerPort};

const READ_LABEL: &str = "read";
const BROADCAST_LABEL: &str = "broadcast";

/// Sampling activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadState {
    Idle,
    Reading,
}

/// What a dispatched schedule did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// One sampling step ran; carries its alarm status.
    Sampled(AlarmStatus),
    /// The cached value was republished.
    Broadcast,
}

/// One telemetry channel: raw source → calibration → history → alarms.
pub struct Sensor<S: Sample, R: RawSource<S>> {
    name: String,
    unit: String,
    read_frequency_hz: f32,
    broadcast_period_ms: u32,
    /// Initial broadcast wish from the config, honoured by `start`.
    broadcast_on_start: bool,
    source: R,
    value: S,
    min_seen: Option<S>,
    max_seen: Option<S>,
    history: Option<BoundedHistoryBuffer<S>>,
    tracker: CalibrationTracker<S>,
    alarms: AlarmEvaluator<S>,
    read_state: ReadState,
    read_handle: Option<ScheduleHandle>,
    broadcast_handle: Option<ScheduleHandle>,
    debug: bool,
}

impl<S: Sample, R: RawSource<S>> Sensor<S, R> {
    /// Build an idle sensor from a validated config.
    ///
    /// The output range starts at `[0, 0]`; call [`set_limits`] before
    /// relying on calibrated values (passthrough sensors excepted).
    ///
    /// [`set_limits`]: Self::set_limits
    pub fn new(config: &SensorConfig, source: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut tracker = CalibrationTracker::new(S::ZERO, S::ZERO);
        tracker.set_passthrough(config.passthrough);

        Ok(Self {
            name: config.name.clone(),
            unit: config.unit.clone(),
            read_frequency_hz: config.read_frequency_hz,
            broadcast_period_ms: config.broadcast_period_ms,
            broadcast_on_start: config.broadcast,
            source,
            value: S::ZERO,
            min_seen: None,
            max_seen: None,
            history: (config.queue_length > 0)
                .then(|| BoundedHistoryBuffer::new(config.queue_length)),
            tracker,
            alarms: AlarmEvaluator::new(),
            read_state: ReadState::Idle,
            read_handle: None,
            broadcast_handle: None,
            debug: false,
        })
    }

    /// Replace the calibration tracker, e.g. with one seeded by
    /// [`CalibrationTracker::with_raw_range`].
    #[must_use]
    pub fn with_tracker(mut self, tracker: CalibrationTracker<S>) -> Self {
        self.tracker = tracker;
        self
    }

    // ── Configuration mutators ────────────────────────────────

    /// Set the calibrated output range.  Applies from the next sample.
    pub fn set_limits(&mut self, min: S, max: S) {
        self.tracker.set_output_range(min, max);
        info!(
            "{}: new limits set to {} {} min and {} {} max",
            self.name, min, self.unit, max, self.unit
        );
    }

    pub fn set_min_alarm(&mut self, threshold: S) {
        self.alarms.set_low(threshold);
        info!("{}: min alarm set to {} {}", self.name, threshold, self.unit);
    }

    pub fn set_max_alarm(&mut self, threshold: S) {
        self.alarms.set_high(threshold);
        info!("{}: max alarm set to {} {}", self.name, threshold, self.unit);
    }

    pub fn clear_min_alarm(&mut self) {
        self.alarms.clear_low();
    }

    pub fn clear_max_alarm(&mut self) {
        self.alarms.clear_high();
    }

    pub fn start_debug(&mut self) {
        self.debug = true;
        info!("{}: start debug mode", self.name);
    }

    pub fn stop_debug(&mut self) {
        self.debug = false;
        info!("{}: stopped debug mode", self.name);
    }

    // ── Sampling lifecycle ────────────────────────────────────

    /// Start sampling, and broadcasting too if the config asked for it.
    pub fn start(&mut self, timers: &mut dyn TimerPort) -> Result<(), SchedulerError> {
        self.start_reading(timers)?;
        if self.broadcast_on_start {
            self.start_broadcasting(timers)?;
        }
        Ok(())
    }

    /// Idle → Reading at the configured frequency.  No-op when already
    /// reading.
    pub fn start_reading(&mut self, timers: &mut dyn TimerPort) -> Result<(), SchedulerError> {
        if self.read_state == ReadState::Reading {
            return Ok(());
        }
        let handle = timers.start_periodic(READ_LABEL, period_from_hz(self.read_frequency_hz))?;
        self.read_handle = Some(handle);
        self.read_state = ReadState::Reading;
        info!("{}: start reading values ({} Hz)", self.name, self.read_frequency_hz);
        Ok(())
    }

    /// Change the sampling rate.  A running schedule is re-registered at
    /// the new rate; an idle sensor just remembers it.
    pub fn set_read_frequency(
        &mut self,
        hz: f32,
        timers: &mut dyn TimerPort,
    ) -> Result<(), Error> {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "read_frequency_hz must be a positive number",
            )
            .into());
        }
        self.read_frequency_hz = hz;
        if self.read_state == ReadState::Reading {
            let handle = timers.start_periodic(READ_LABEL, period_from_hz(hz))?;
            // Replacing drops (and disarms) the old registration.
            self.read_handle = Some(handle);
            info!("{}: reading frequency set to {} Hz", self.name, hz);
        }
        Ok(())
    }

    /// Reading → Idle.  Safe to call at any time; no-op when idle.
    pub fn stop_reading(&mut self) {
        self.read_handle = None;
        if self.read_state == ReadState::Reading {
            self.read_state = ReadState::Idle;
            info!("{}: reading stopped", self.name);
        }
    }

    // ── Broadcasting ──────────────────────────────────────────

    /// Begin republishing the cached value every broadcast period.
    /// No-op when already broadcasting.
    pub fn start_broadcasting(&mut self, timers: &mut dyn TimerPort) -> Result<(), SchedulerError> {
        if self.broadcast_handle.is_some() {
            return Ok(());
        }
        let handle = timers.start_periodic(BROADCAST_LABEL, self.broadcast_period_ms)?;
        self.broadcast_handle = Some(handle);
        info!("{}: start broadcasting values", self.name);
        Ok(())
    }

    /// Set a new broadcast period and (re)start broadcasting with it.
    pub fn set_broadcast_period(
        &mut self,
        period_ms: u32,
        timers: &mut dyn TimerPort,
    ) -> Result<(), SchedulerError> {
        if period_ms == 0 {
            return Err(SchedulerError::InvalidPeriod);
        }
        let handle = timers.start_periodic(BROADCAST_LABEL, period_ms)?;
        self.broadcast_period_ms = period_ms;
        self.broadcast_handle = Some(handle);
        info!(
            "{}: broadcast period set to {}ms, broadcast restarted",
            self.name, period_ms
        );
        Ok(())
    }

    pub fn stop_broadcasting(&mut self) {
        if self.broadcast_handle.take().is_some() {
            info!("{}: stopped broadcasting", self.name);
        }
    }

    // ── Periodic work ─────────────────────────────────────────

    /// One sampling step.  Alarms come back as the returned status;
    /// nothing here panics or unwinds into the caller's scheduler.
    pub fn sample(&mut self) -> AlarmStatus {
        let raw = self.source.read();
        let range_before = self.tracker.raw_range();
        let value = self.tracker.observe(raw);

        if self.debug {
            info!("{}: raw readout {}", self.name, raw);
            if range_before != self.tracker.raw_range() {
                info!("{}: raw range now {:?}", self.name, self.tracker.raw_range());
            }
        }

        self.value = value;
        if self.min_seen.is_none_or(|min| value < min) {
            self.min_seen = Some(value);
        }
        if self.max_seen.is_none_or(|max| value > max) {
            self.max_seen = Some(value);
        }
        if let Some(history) = self.history.as_mut() {
            history.put(value);
        }

        self.alarms.evaluate(value, &self.name, &self.unit)
    }

    /// Republish the cached value.
    pub fn broadcast<P: PublishSink + ?Sized>(&self, sink: &mut P) {
        sink.publish(&self.name, &self.unit, self.value.to_reading());
    }

    /// Route a fired schedule to the matching periodic step.
    ///
    /// Returns `None` when `id` belongs to some other owner.  Alarms from
    /// a sampling step are forwarded to `sink` and returned as well.
    pub fn on_schedule_fired<K: TelemetrySink + ?Sized>(
        &mut self,
        id: ScheduleId,
        sink: &mut K,
    ) -> Option<TickOutcome> {
        if owns(self.read_handle.as_ref(), id) {
            let status = self.sample();
            if let Some(alarm) = status.alarm() {
                sink.raise(alarm);
            }
            return Some(TickOutcome::Sampled(status));
        }
        if owns(self.broadcast_handle.as_ref(), id) {
            debug!("{}: broadcast tick", self.name);
            self.broadcast(sink);
            return Some(TickOutcome::Broadcast);
        }
        None
    }

    // ── Queries ───────────────────────────────────────────────

    /// Last calibrated value (zero before the first sample).
    pub fn get_value(&self) -> S {
        self.value
    }

    /// Mean of the retained history.
    pub fn get_avg_value(&self) -> Result<S, TelemetryError> {
        self.history
            .as_ref()
            .ok_or(TelemetryError::NoHistory)?
            .average()
    }

    /// Lowest calibrated value ever sampled.
    pub fn get_min_read_value(&self) -> Option<S> {
        self.min_seen
    }

    /// Highest calibrated value ever sampled.
    pub fn get_max_read_value(&self) -> Option<S> {
        self.max_seen
    }

    /// Forget retained samples; lifetime extrema are kept.
    pub fn reset_history(&mut self) {
        if let Some(history) = self.history.as_mut() {
            history.clear();
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.as_ref().map_or(0, BoundedHistoryBuffer::size)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn read_frequency_hz(&self) -> f32 {
        self.read_frequency_hz
    }

    pub fn broadcast_period_ms(&self) -> u32 {
        self.broadcast_period_ms
    }

    pub fn read_state(&self) -> ReadState {
        self.read_state
    }

    pub fn is_reading(&self) -> bool {
        self.read_state == ReadState::Reading
    }

    pub fn is_broadcasting(&self) -> bool {
        self.broadcast_handle.is_some()
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn tracker(&self) -> &CalibrationTracker<S> {
        &self.tracker
    }

    pub fn alarms(&self) -> &AlarmEvaluator<S> {
        &self.alarms
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut R {
        &mut self.source
    }
}

fn owns(handle: Option<&ScheduleHandle>, id: ScheduleId) -> bool {
    handle.is_some_and(|h| h.id() == id)
}
