//! Potentiometer on an analog input (rudder feedback, throttle stick…).
//!
//! Produces the raw 16-bit wiper position; the sensor's calibration
//! tracker maps it into the configured limits.  Implements
//! [`RawSource`] for both `f32` and `i32`, so the same driver feeds a
//! float or an integer sensor.

use crate::app::ports::RawSource;

use super::read_adc_u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Potentiometer {
    channel: u32,
}

impl Potentiometer {
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> u32 {
        self.channel
    }

    fn read_counts(&self) -> u16 {
        read_adc_u16(self.channel)
    }
}

impl RawSource<f32> for Potentiometer {
    fn read(&mut self) -> f32 {
        f32::from(self.read_counts())
    }
}

impl RawSource<i32> for Potentiometer {
    fn read(&mut self) -> i32 {
        i32::from(self.read_counts())
    }
}
