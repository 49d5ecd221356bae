//! Fuzz target: `SensorConfig::from_json`
//!
//! Feeds arbitrary bytes to the JSON config loader and verifies:
//! - No panics under arbitrary input
//! - Every accepted config passes `validate()` and builds a `Sensor`
//!
//! cargo fuzz run fuzz_sensor_config

#![no_main]

use libfuzzer_sys::fuzz_target;
use rcsense::{Sensor, SensorConfig};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = SensorConfig::from_json(text) {
        assert!(config.validate().is_ok());
        let mut sensor = Sensor::new(&config, || 1.0_f32).expect("validated config must build");
        sensor.sample();
    }
});
