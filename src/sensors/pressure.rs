//! Ratiometric pressure transducer (ballast tanks, air supply).
//!
//! The transducer output is linear in pressure; the transfer function is
//! given as a [`LinearAdc`] so the reading is already in the sensor's
//! unit and the owning sensor typically runs in passthrough.

use crate::app::ports::RawSource;

use super::LinearAdc;

pub struct PressureTransducer {
    adc: LinearAdc,
}

impl PressureTransducer {
    pub fn new(adc: LinearAdc) -> Self {
        Self { adc }
    }

    /// Transducer spanning `[0, full_scale]` over the ADC range.
    pub fn spanning(channel: u32, full_scale: f32) -> Self {
        Self::new(LinearAdc::spanning(channel, full_scale))
    }
}

impl RawSource<f32> for PressureTransducer {
    fn read(&mut self) -> f32 {
        self.adc.read().max(0.0)
    }
}
