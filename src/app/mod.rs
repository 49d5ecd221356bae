//! Application core: pure telemetry logic, zero I/O.
//!
//! The [`sensor::Sensor`] orchestrator ties one history buffer, one
//! calibration tracker and one alarm evaluator to an injected raw
//! source.  All interaction with hardware and timers happens through
//! the **port traits** in [`ports`].

pub mod ports;
pub mod sensor;
