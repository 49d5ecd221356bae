//! Mock sources, sinks and scheduler delegates for integration tests.
//!
//! Records every publish and alarm so tests can assert on the full
//! output history without a serial console.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use rcsense::app::ports::{AlarmSink, PublishSink, RawSource, SchedulerDelegate};
use rcsense::{Alarm, Reading, Sample, ScheduleId, Sensor, TickOutcome};

// ── Scripted raw source ───────────────────────────────────────

/// Replays queued raw values; once drained, repeats the last one.
/// Cloning shares the queue so a test can keep feeding a source that
/// has already been moved into a sensor.
#[derive(Clone)]
pub struct ScriptedSource<S: Sample> {
    queue: Rc<RefCell<VecDeque<S>>>,
    last: Rc<RefCell<S>>,
    reads: Rc<RefCell<usize>>,
}

#[allow(dead_code)]
impl<S: Sample> ScriptedSource<S> {
    pub fn new(values: &[S]) -> Self {
        Self {
            queue: Rc::new(RefCell::new(values.iter().copied().collect())),
            last: Rc::new(RefCell::new(S::ZERO)),
            reads: Rc::new(RefCell::new(0)),
        }
    }

    pub fn push(&self, value: S) {
        self.queue.borrow_mut().push_back(value);
    }

    pub fn reads(&self) -> usize {
        *self.reads.borrow()
    }
}

impl<S: Sample> RawSource<S> for ScriptedSource<S> {
    fn read(&mut self) -> S {
        *self.reads.borrow_mut() += 1;
        if let Some(v) = self.queue.borrow_mut().pop_front() {
            *self.last.borrow_mut() = v;
        }
        *self.last.borrow()
    }
}

// ── Recording sink ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub name: String,
    pub unit: String,
    pub value: Reading,
}

#[derive(Default)]
pub struct RecordingSink {
    pub published: Vec<Published>,
    pub alarms: Vec<Alarm>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_published(&self) -> Option<&Published> {
        self.published.last()
    }
}

impl PublishSink for RecordingSink {
    fn publish(&mut self, name: &str, unit: &str, value: Reading) {
        self.published.push(Published {
            name: name.to_owned(),
            unit: unit.to_owned(),
            value,
        });
    }
}

impl AlarmSink for RecordingSink {
    fn raise(&mut self, alarm: &Alarm) {
        self.alarms.push(alarm.clone());
    }
}

// ── Single-sensor delegate ────────────────────────────────────

/// Routes every fired schedule to one sensor and records what happened.
pub struct SensorDelegate<'a, S: Sample, R: RawSource<S>> {
    pub sensor: &'a mut Sensor<S, R>,
    pub sink: &'a mut RecordingSink,
    pub outcomes: Vec<TickOutcome>,
    pub unrouted: Vec<ScheduleId>,
}

impl<'a, S: Sample, R: RawSource<S>> SensorDelegate<'a, S, R> {
    pub fn new(sensor: &'a mut Sensor<S, R>, sink: &'a mut RecordingSink) -> Self {
        Self {
            sensor,
            sink,
            outcomes: Vec::new(),
            unrouted: Vec::new(),
        }
    }
}

impl<S: Sample, R: RawSource<S>> SchedulerDelegate for SensorDelegate<'_, S, R> {
    fn on_schedule_fired(&mut self, id: ScheduleId, _label: &str) {
        match self.sensor.on_schedule_fired(id, &mut *self.sink) {
            Some(outcome) => self.outcomes.push(outcome),
            None => self.unrouted.push(id),
        }
    }
}
