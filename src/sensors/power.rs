//! Battery voltage, current and power metering.
//!
//! [`VoltageMeter`] and [`CurrentMeter`] are linear ADC sources.
//! [`PowerSource`] multiplies any voltage and current source; it keeps
//! the last pair so the split can be logged or broadcast alongside the
//! power sensor.

use crate::app::ports::RawSource;

use super::LinearAdc;

pub struct VoltageMeter {
    adc: LinearAdc,
}

impl VoltageMeter {
    pub fn new(adc: LinearAdc) -> Self {
        Self { adc }
    }
}

impl RawSource<f32> for VoltageMeter {
    fn read(&mut self) -> f32 {
        self.adc.read()
    }
}

pub struct CurrentMeter {
    adc: LinearAdc,
}

impl CurrentMeter {
    pub fn new(adc: LinearAdc) -> Self {
        Self { adc }
    }
}

impl RawSource<f32> for CurrentMeter {
    fn read(&mut self) -> f32 {
        self.adc.read()
    }
}

/// Electrical power (W) as voltage × current.
pub struct PowerSource<V, I> {
    voltage: V,
    current: I,
    last_voltage: f32,
    last_current: f32,
}

impl<V: RawSource<f32>, I: RawSource<f32>> PowerSource<V, I> {
    pub fn new(voltage: V, current: I) -> Self {
        Self {
            voltage,
            current,
            last_voltage: 0.0,
            last_current: 0.0,
        }
    }

    /// Voltage of the last read (V).
    pub fn voltage(&self) -> f32 {
        self.last_voltage
    }

    /// Current of the last read (A).
    pub fn current(&self) -> f32 {
        self.last_current
    }
}

impl<V: RawSource<f32>, I: RawSource<f32>> RawSource<f32> for PowerSource<V, I> {
    fn read(&mut self) -> f32 {
        self.last_voltage = self.voltage.read();
        self.last_current = self.current.read();
        self.last_voltage * self.last_current
    }
}
