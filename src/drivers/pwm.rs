//! PWM outputs over any `embedded_hal` PWM channel.
//!
//! [`PwmOutput`] restricts the raw duty to a `[min, max]` window (servo
//! endpoints, LED driver dead band) and maps a 0–100 % request into it
//! with the same integer interpolation the sensors use.  [`Light`] adds a
//! dimmer and an on/off state on top.
//!
//! On ESP-IDF the channel is an `esp_idf_hal::ledc::LedcDriver`; host tests
//! plug in a recording fake.

use embedded_hal::pwm::SetDutyCycle;
use log::debug;

use crate::calibration::convert;

pub struct PwmOutput<P: SetDutyCycle> {
    channel: P,
    name: &'static str,
    min_duty: u16,
    max_duty: u16,
    raw_duty: u16,
}

impl<P: SetDutyCycle> PwmOutput<P> {
    /// Wrap `channel` with the full hardware duty range as window.  The
    /// output starts at 0 % duty.
    pub fn new(mut channel: P, name: &'static str) -> Result<Self, P::Error> {
        let max_duty = channel.max_duty_cycle();
        channel.set_duty_cycle_fully_off()?;
        Ok(Self {
            channel,
            name,
            min_duty: 0,
            max_duty,
            raw_duty: 0,
        })
    }

    pub fn set_min_duty(&mut self, min_duty: u16) {
        self.min_duty = min_duty.min(self.channel.max_duty_cycle());
    }

    pub fn set_max_duty(&mut self, max_duty: u16) {
        self.max_duty = max_duty.min(self.channel.max_duty_cycle());
    }

    /// Write a raw duty value (clamped to the hardware maximum).
    pub fn set_raw_duty(&mut self, raw_duty: u16) -> Result<(), P::Error> {
        let raw_duty = raw_duty.min(self.channel.max_duty_cycle());
        self.channel.set_duty_cycle(raw_duty)?;
        self.raw_duty = raw_duty;
        Ok(())
    }

    /// Map `percent` (clamped to 0–100) into the `[min, max]` window.
    pub fn set_duty_percent(&mut self, percent: u8) -> Result<(), P::Error> {
        let percent = percent.min(100);
        let raw = convert::<i32>(
            i32::from(percent),
            0,
            100,
            i32::from(self.min_duty),
            i32::from(self.max_duty),
        );
        let raw = raw.clamp(0, i32::from(u16::MAX)) as u16;
        debug!("{}: duty {} ({}%)", self.name, raw, percent);
        self.set_raw_duty(raw)
    }

    pub fn raw_duty(&self) -> u16 {
        self.raw_duty
    }

    pub fn min_duty(&self) -> u16 {
        self.min_duty
    }

    pub fn max_duty(&self) -> u16 {
        self.max_duty
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Dimmable light.  The dimmer value is subtracted from the window
/// maximum while the light is on; off drives the window minimum.
pub struct Light<P: SetDutyCycle> {
    output: PwmOutput<P>,
    dim_value: u16,
    on: bool,
}

impl<P: SetDutyCycle> Light<P> {
    pub fn new(output: PwmOutput<P>) -> Self {
        Self {
            output,
            dim_value: 0,
            on: false,
        }
    }

    /// Takes effect immediately if the light is on.
    pub fn set_dim_value(&mut self, dim_value: u16) -> Result<(), P::Error> {
        self.dim_value = dim_value;
        if self.on {
            self.output.set_raw_duty(self.on_duty())?;
        }
        Ok(())
    }

    pub fn switch_on(&mut self) -> Result<(), P::Error> {
        self.output.set_raw_duty(self.on_duty())?;
        self.on = true;
        Ok(())
    }

    pub fn switch_off(&mut self) -> Result<(), P::Error> {
        self.output.set_raw_duty(self.output.min_duty())?;
        self.on = false;
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn dim_value(&self) -> u16 {
        self.dim_value
    }

    pub fn output(&self) -> &PwmOutput<P> {
        &self.output
    }

    fn on_duty(&self) -> u16 {
        self.output
            .max_duty()
            .saturating_sub(self.dim_value)
            .max(self.output.min_duty())
    }
}
