//! Temperature probes on an analog input.
//!
//! Two probe kinds are supported:
//!
//! - **Analog voltage** (LM35-style linear output): reports the raw
//!   16-bit reading; the sensor's calibration tracker maps it to °C.
//! - **NTC thermistor** (10 kΩ @ 25 °C, B = 3950) in a divider with a
//!   fixed 10 kΩ resistor: converted to °C here with the Beta equation,
//!   so the owning sensor should run in passthrough.
//!
//! Unknown probe codes read 0.

use log::warn;

use crate::app::ports::RawSource;

use super::{ADC_FULL_SCALE, read_adc_u16};

const R25: f32 = 10_000.0;
const BETA: f32 = 3950.0;
const T25_K: f32 = 298.15;
const R_DIVIDER: f32 = 10_000.0;
const V_REF: f32 = 3.3;
/// Reported when the divider reads open or shorted.
const NTC_FAULT_C: f32 = -40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    AnalogVoltage,
    Ntc,
    Unsupported(u8),
}

impl ProbeKind {
    /// Map a configuration code (1 = analog voltage, 2 = NTC).
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::AnalogVoltage,
            2 => Self::Ntc,
            other => Self::Unsupported(other),
        }
    }
}

pub struct TemperatureProbe {
    kind: ProbeKind,
    channel: u32,
}

impl TemperatureProbe {
    pub fn new(kind: ProbeKind, channel: u32) -> Self {
        if let ProbeKind::Unsupported(code) = kind {
            warn!("temperature: probe type {} not supported, readings will be 0", code);
        }
        Self { kind, channel }
    }

    pub fn kind(&self) -> ProbeKind {
        self.kind
    }
}

impl RawSource<f32> for TemperatureProbe {
    fn read(&mut self) -> f32 {
        match self.kind {
            ProbeKind::AnalogVoltage => f32::from(read_adc_u16(self.channel)),
            ProbeKind::Ntc => ntc_celsius(read_adc_u16(self.channel)),
            ProbeKind::Unsupported(_) => 0.0,
        }
    }
}

/// Beta-equation conversion of a 16-bit divider reading.
pub fn ntc_celsius(raw: u16) -> f32 {
    let voltage = f32::from(raw) / f32::from(ADC_FULL_SCALE) * V_REF;
    if voltage <= 0.01 || voltage >= (V_REF - 0.01) {
        return NTC_FAULT_C;
    }
    let r_ntc = R_DIVIDER * voltage / (V_REF - voltage);
    let inv_t = (1.0 / T25_K) + (1.0 / BETA) * (r_ntc / R25).ln();
    if inv_t <= 0.0 {
        return NTC_FAULT_C;
    }
    (1.0 / inv_t) - 273.15
}
