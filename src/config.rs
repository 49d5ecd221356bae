//! Static sensor configuration.
//!
//! One [`SensorConfig`] per sensor, fixed at construction.  Presets
//! mirror the physical variants fitted to the models (temperature
//! probes, shaft RPM, power metering).  Limits and alarm points are not
//! part of the config: they are set through the sensor's mutators and
//! may change while it runs.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound on `queue_length`, keeps a bad config from reserving
/// an unreasonable history allocation.
pub const MAX_QUEUE_LENGTH: usize = 4096;

/// Sensor construction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Human-readable name, used in logs, broadcasts and alarm messages.
    pub name: String,
    /// Engineering unit of the calibrated value.
    pub unit: String,
    /// Sampling rate (Hz).
    pub read_frequency_hz: f32,
    /// History depth for averaging; 0 disables history.
    pub queue_length: usize,
    /// Whether broadcasting is wanted from the start.
    pub broadcast: bool,
    /// Republish period (milliseconds).
    pub broadcast_period_ms: u32,
    /// Skip calibration and use the raw value (rate-like units).
    pub passthrough: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            name: String::from("Sensor"),
            unit: String::new(),
            read_frequency_hz: 10.0,
            queue_length: 0,
            broadcast: false,
            broadcast_period_ms: 1000,
            passthrough: false,
        }
    }
}

impl SensorConfig {
    pub fn new(name: &str, unit: &str) -> Self {
        Self {
            name: name.to_owned(),
            unit: unit.to_owned(),
            ..Self::default()
        }
    }

    /// Temperature probe: °C, 50-sample history, broadcasting.
    pub fn temperature(name: &str) -> Self {
        Self {
            queue_length: 50,
            broadcast: true,
            ..Self::new(name, "°C")
        }
    }

    /// Shaft speed: RPM passes through calibration untouched.
    pub fn rpm(name: &str) -> Self {
        Self {
            queue_length: 50,
            broadcast: true,
            passthrough: true,
            ..Self::new(name, "RPM")
        }
    }

    /// Electrical power: 1 Hz, 10-sample history.
    pub fn power() -> Self {
        Self {
            read_frequency_hz: 1.0,
            queue_length: 10,
            passthrough: true,
            ..Self::new("Power", "W")
        }
    }

    #[must_use]
    pub fn with_queue_length(mut self, queue_length: usize) -> Self {
        self.queue_length = queue_length;
        self
    }

    #[must_use]
    pub fn with_read_frequency(mut self, hz: f32) -> Self {
        self.read_frequency_hz = hz;
        self
    }

    #[must_use]
    pub fn with_broadcast(mut self, broadcast: bool) -> Self {
        self.broadcast = broadcast;
        self
    }

    /// Reject values that would make the sensor unschedulable or
    /// meaningless.  Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("name must not be empty"));
        }
        if !self.read_frequency_hz.is_finite() || self.read_frequency_hz <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "read_frequency_hz must be a positive number",
            ));
        }
        if self.broadcast_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("broadcast_period_ms must be > 0"));
        }
        if self.queue_length > MAX_QUEUE_LENGTH {
            return Err(ConfigError::ValidationFailed("queue_length exceeds MAX_QUEUE_LENGTH"));
        }
        Ok(())
    }

    /// Parse a JSON document (missing fields take their defaults) and
    /// validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            log::warn!("config: JSON parse failed: {}", e);
            ConfigError::Parse
        })?;
        config.validate()?;
        Ok(config)
    }
}
