//! rcsense: telemetry acquisition core for functional RC ship models.
//!
//! Exposes the pure-logic modules for integration testing and host
//! simulation.  All ESP-IDF-specific code is guarded by
//! `#[cfg(feature = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod alarm;
pub mod app;
pub mod calibration;
pub mod config;
pub mod error;
pub mod history;
pub mod sample;
pub mod scheduler;

pub mod adapters;
pub mod drivers;
pub mod pins;
pub mod sensors;

pub use alarm::{Alarm, AlarmEvaluator, AlarmKind, AlarmStatus};
pub use app::ports::{AlarmSink, Clock, PublishSink, RawSource, TelemetrySink, TimerPort};
pub use app::sensor::{ReadState, Sensor, TickOutcome};
pub use calibration::{CalibrationTracker, convert};
pub use config::SensorConfig;
pub use error::{ConfigError, Error, Result, SchedulerError, TelemetryError};
pub use history::BoundedHistoryBuffer;
pub use sample::{Reading, Sample};
pub use scheduler::{ScheduleHandle, ScheduleId, TickScheduler};
