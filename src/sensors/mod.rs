//! Physical raw sources.
//!
//! Each driver implements [`RawSource`](crate::app::ports::RawSource) for
//! the sample kind it naturally produces and is plugged into a
//! [`Sensor`](crate::app::sensor::Sensor).  Calibration, history and
//! alarms all live in the sensor; drivers only produce raw values.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: analog channels are read through the ADC1 oneshot unit
//! (initialised by `hw_init`).  On host/test: each channel reads from a
//! static `AtomicU16` that tests inject with [`sim_set_adc`].
//!
//! Raw analog values are reported on the 16-bit scale (0–65535), the
//! 12-bit conversion result being stretched to full range.

pub mod potentiometer;
pub mod power;
pub mod pressure;
pub mod rpm;
pub mod temperature;
pub mod water_level;

#[cfg(not(feature = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use crate::calibration::CalibrationTracker;
#[cfg(feature = "espidf")]
use crate::drivers::hw_init;

/// Number of ADC1 channels on the ESP32-S3.
pub const ADC_CHANNELS: usize = 10;

/// Full-scale value of a raw analog read.
pub const ADC_FULL_SCALE: u16 = u16::MAX;

#[cfg(not(feature = "espidf"))]
static SIM_ADC: [AtomicU16; ADC_CHANNELS] = [const { AtomicU16::new(0) }; ADC_CHANNELS];

/// Inject a 16-bit raw reading for `channel`.  Out-of-range channels are
/// ignored.
#[cfg(not(feature = "espidf"))]
pub fn sim_set_adc(channel: u32, raw: u16) {
    if let Some(slot) = SIM_ADC.get(channel as usize) {
        slot.store(raw, Ordering::Relaxed);
    }
}

/// Read `channel` on the 16-bit scale.
#[cfg(feature = "espidf")]
pub fn read_adc_u16(channel: u32) -> u16 {
    widen_12_bit(hw_init::adc1_read(channel))
}

/// Read `channel` on the 16-bit scale.
#[cfg(not(feature = "espidf"))]
pub fn read_adc_u16(channel: u32) -> u16 {
    SIM_ADC
        .get(channel as usize)
        .map_or(0, |slot| slot.load(Ordering::Relaxed))
}

/// Tracker whose raw span is pinned to the full ADC scale, so the first
/// readings of an analog source map linearly instead of auto-ranging.
pub fn full_scale_tracker() -> CalibrationTracker<f32> {
    CalibrationTracker::new(0.0, 0.0).with_raw_range(0.0, f32::from(ADC_FULL_SCALE))
}

/// Stretch a 12-bit conversion to 16 bits, replicating the top bits so
/// that 4095 maps to 65535.
pub fn widen_12_bit(raw: u16) -> u16 {
    let raw = raw.min(0x0FFF);
    (raw << 4) | (raw >> 8)
}

/// Linear transfer function from raw ADC counts to an engineering value:
/// `offset + counts * scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearAdc {
    pub channel: u32,
    pub scale: f32,
    pub offset: f32,
}

impl LinearAdc {
    pub fn new(channel: u32, scale: f32, offset: f32) -> Self {
        Self {
            channel,
            scale,
            offset,
        }
    }

    /// Full-scale span `[0, full]` mapped over the 16-bit range.
    pub fn spanning(channel: u32, full: f32) -> Self {
        Self::new(channel, full / f32::from(ADC_FULL_SCALE), 0.0)
    }

    pub fn read(&self) -> f32 {
        self.offset + f32::from(read_adc_u16(self.channel)) * self.scale
    }
}
