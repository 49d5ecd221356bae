//! Low/high threshold alarms on calibrated values.
//!
//! A breach is reported as an [`AlarmStatus`] value, never as an error or
//! a panic, so it can be returned from inside a timer-driven sampling
//! step without unwinding through the scheduler.

use core::fmt;

use crate::sample::{Reading, Sample};

/// Which threshold was crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmKind {
    Low,
    High,
}

/// A threshold breach with a deterministic human-readable message.
#[derive(Debug, Clone, PartialEq)]
pub struct Alarm {
    pub kind: AlarmKind,
    pub sensor: String,
    pub value: Reading,
    pub threshold: Reading,
    pub message: String,
}

impl Alarm {
    fn new<S: Sample>(kind: AlarmKind, name: &str, unit: &str, value: S, threshold: S) -> Self {
        let direction = match kind {
            AlarmKind::Low => "below",
            AlarmKind::High => "above",
        };
        Self {
            kind,
            sensor: name.to_owned(),
            value: value.to_reading(),
            threshold: threshold.to_reading(),
            message: format!(
                "{name}: measured value {value} {unit} {direction} set alarm point of {threshold} {unit}."
            ),
        }
    }
}

impl fmt::Display for Alarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum AlarmStatus {
    Ok,
    Low(Alarm),
    High(Alarm),
}

impl AlarmStatus {
    pub fn is_alarm(&self) -> bool {
        !matches!(self, Self::Ok)
    }

    pub fn alarm(&self) -> Option<&Alarm> {
        match self {
            Self::Ok => None,
            Self::Low(a) | Self::High(a) => Some(a),
        }
    }
}

/// Independently enabled low and high thresholds.
#[derive(Debug, Clone, Default)]
pub struct AlarmEvaluator<S: Sample> {
    low: Option<S>,
    high: Option<S>,
}

impl<S: Sample> AlarmEvaluator<S> {
    pub fn new() -> Self {
        Self { low: None, high: None }
    }

    /// Enable the low check: values strictly below `threshold` alarm.
    pub fn set_low(&mut self, threshold: S) {
        self.low = Some(threshold);
    }

    /// Enable the high check: values strictly above `threshold` alarm.
    pub fn set_high(&mut self, threshold: S) {
        self.high = Some(threshold);
    }

    pub fn clear_low(&mut self) {
        self.low = None;
    }

    pub fn clear_high(&mut self) {
        self.high = None;
    }

    pub fn low(&self) -> Option<S> {
        self.low
    }

    pub fn high(&self) -> Option<S> {
        self.high
    }

    /// Compare `value` against the enabled thresholds.
    ///
    /// If both are breached (low above high, a misconfiguration) the
    /// low alarm is reported.
    pub fn evaluate(&self, value: S, name: &str, unit: &str) -> AlarmStatus {
        if let Some(low) = self.low {
            if value < low {
                return AlarmStatus::Low(Alarm::new(AlarmKind::Low, name, unit, value, low));
            }
        }
        if let Some(high) = self.high {
            if value > high {
                return AlarmStatus::High(Alarm::new(AlarmKind::High, name, unit, value, high));
            }
        }
        AlarmStatus::Ok
    }
}
