//! Log-based telemetry sink adapter.
//!
//! Implements [`PublishSink`] and [`AlarmSink`] by writing to the ESP-IDF
//! logger (UART / USB-CDC in production).  A radio-link adapter to the
//! transmitter would implement the same traits.

use log::{info, warn};

use crate::alarm::Alarm;
use crate::app::ports::{AlarmSink, PublishSink};
use crate::sample::Reading;

/// Adapter that logs every broadcast and alarm to the serial console.
#[derive(Debug, Default)]
pub struct LogSink {
    published: u32,
    alarms: u32,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcasts written so far.
    pub fn published(&self) -> u32 {
        self.published
    }

    /// Alarms written so far.
    pub fn alarms(&self) -> u32 {
        self.alarms
    }
}

impl PublishSink for LogSink {
    fn publish(&mut self, name: &str, unit: &str, value: Reading) {
        self.published = self.published.wrapping_add(1);
        info!("{}: {} {}", name, value, unit);
    }
}

impl AlarmSink for LogSink {
    fn raise(&mut self, alarm: &Alarm) {
        self.alarms = self.alarms.wrapping_add(1);
        warn!("ALARM | {}", alarm.message);
    }
}
