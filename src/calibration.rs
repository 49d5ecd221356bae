//! Auto-ranging linear calibration.
//!
//! The tracker remembers the lowest and highest raw value it has ever
//! seen and maps each new raw sample from that span into the configured
//! output range.  The span only ever widens, so a sensor calibrates
//! itself as it is swept through its travel (a rudder potentiometer
//! moved end to end, a probe taken through its temperature range).

use log::trace;

use crate::sample::Sample;

/// Map `x` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// Returns zero when `in_max == in_min` instead of dividing by zero.
/// Integer kinds use floor division.
pub fn convert<S: Sample>(x: S, in_min: S, in_max: S, out_min: S, out_max: S) -> S {
    S::interpolate(x, in_min, in_max, out_min, out_max)
}

/// Raw watermarks plus the fixed output range they map onto.
#[derive(Debug, Clone)]
pub struct CalibrationTracker<S: Sample> {
    raw_min: Option<S>,
    raw_max: Option<S>,
    out_min: S,
    out_max: S,
    /// Rate-like units (shaft speed) bypass the mapping.
    passthrough: bool,
}

impl<S: Sample> CalibrationTracker<S> {
    pub fn new(out_min: S, out_max: S) -> Self {
        Self {
            raw_min: None,
            raw_max: None,
            out_min,
            out_max,
            passthrough: false,
        }
    }

    /// A tracker whose `observe` returns the raw value unchanged.
    pub fn passthrough() -> Self {
        Self {
            passthrough: true,
            ..Self::new(S::ZERO, S::ZERO)
        }
    }

    /// Seed the watermarks with an expected raw span, e.g. the ADC
    /// full-scale range.  Later observations may still widen it.
    #[must_use]
    pub fn with_raw_range(mut self, min: S, max: S) -> Self {
        self.raw_min = Some(min);
        self.raw_max = Some(max);
        self
    }

    pub fn set_passthrough(&mut self, passthrough: bool) {
        self.passthrough = passthrough;
    }

    pub fn set_output_range(&mut self, out_min: S, out_max: S) {
        self.out_min = out_min;
        self.out_max = out_max;
    }

    /// Widen the watermarks with `raw`, then map it into the output range.
    pub fn observe(&mut self, raw: S) -> S {
        if self.raw_min.is_none_or(|min| raw < min) {
            trace!("calibration: raw_min -> {raw}");
            self.raw_min = Some(raw);
        }
        if self.raw_max.is_none_or(|max| raw > max) {
            trace!("calibration: raw_max -> {raw}");
            self.raw_max = Some(raw);
        }

        if self.passthrough {
            return raw;
        }
        let (in_min, in_max) = (self.raw_min.unwrap_or(raw), self.raw_max.unwrap_or(raw));
        convert(raw, in_min, in_max, self.out_min, self.out_max)
    }

    /// Observed raw span, `None` before the first observation.
    pub fn raw_range(&self) -> Option<(S, S)> {
        self.raw_min.zip(self.raw_max)
    }

    pub fn raw_min(&self) -> Option<S> {
        self.raw_min
    }

    pub fn raw_max(&self) -> Option<S> {
        self.raw_max
    }

    pub fn output_range(&self) -> (S, S) {
        (self.out_min, self.out_max)
    }

    pub fn is_passthrough(&self) -> bool {
        self.passthrough
    }
}
