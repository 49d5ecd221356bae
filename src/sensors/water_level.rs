//! Water detection probe (bilge, ballast overflow).
//!
//! Any `embedded_hal` input pin works: HIGH means water present and reads
//! as 1, dry reads 0.  A failed pin read keeps the previous level.

use embedded_hal::digital::InputPin;
use log::warn;

use crate::app::ports::RawSource;

pub struct WaterSensor<P: InputPin> {
    pin: P,
    last: i32,
}

impl<P: InputPin> WaterSensor<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, last: 0 }
    }

    pub fn water_present(&self) -> bool {
        self.last != 0
    }
}

impl<P: InputPin> RawSource<i32> for WaterSensor<P> {
    fn read(&mut self) -> i32 {
        match self.pin.is_high() {
            Ok(high) => self.last = i32::from(high),
            Err(e) => warn!("water sensor: pin read failed ({:?}), keeping last level", e),
        }
        self.last
    }
}
