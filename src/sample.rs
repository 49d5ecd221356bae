//! Numeric sample kinds.
//!
//! A buffer, tracker or sensor is parameterised over exactly one
//! [`Sample`] kind chosen when it is built.  Integer kinds average and
//! interpolate with floor division; floating-point kinds divide exactly.
//! Nothing inspects a stored value to decide which arithmetic to use.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A numeric sample stored in history and fed through calibration.
pub trait Sample: Copy + PartialOrd + Default + fmt::Display + fmt::Debug {
    /// Additive identity, also the degenerate-range interpolation result.
    const ZERO: Self;

    /// Arithmetic mean of `samples`, or `None` when there are none.
    fn mean<I>(samples: I) -> Option<Self>
    where
        I: ExactSizeIterator<Item = Self>;

    /// `(x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min`,
    /// returning [`Sample::ZERO`] when `in_max == in_min`.
    fn interpolate(x: Self, in_min: Self, in_max: Self, out_min: Self, out_max: Self) -> Self;

    /// Kind-erased copy of the value for sinks and alarm payloads.
    fn to_reading(self) -> Reading;
}

/// A sample with its kind erased, as handed to publish and alarm sinks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Reading {
    Integer(i64),
    Float(f64),
}

impl Reading {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Integer division rounding toward negative infinity.
///
/// `b` must be non-zero.  `i128::MIN / -1` saturates.
pub(crate) fn floor_div(a: i128, b: i128) -> i128 {
    let q = a.checked_div(b).unwrap_or(i128::MAX);
    if a.checked_rem(b).unwrap_or(0) != 0 && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

trait Bounded {
    const MIN: Self;
    const MAX: Self;
}

/// Narrow a widened intermediate back into the sample kind, clamping at
/// the kind's limits.
fn saturate<T>(v: i128) -> T
where
    T: TryFrom<i128> + Bounded,
{
    T::try_from(v).unwrap_or(if v < 0 { T::MIN } else { T::MAX })
}

macro_rules! impl_integer_sample {
    ($($t:ty),*) => {$(
        impl Sample for $t {
            const ZERO: Self = 0;

            fn mean<I>(samples: I) -> Option<Self>
            where
                I: ExactSizeIterator<Item = Self>,
            {
                let len = samples.len() as i128;
                if len == 0 {
                    return None;
                }
                let sum: i128 = samples.map(i128::from).sum();
                Some(saturate(floor_div(sum, len)))
            }

            fn interpolate(x: Self, in_min: Self, in_max: Self, out_min: Self, out_max: Self) -> Self {
                let span_in = i128::from(in_max) - i128::from(in_min);
                if span_in == 0 {
                    return 0;
                }
                // saturates only at the i64 extremes
                let scaled = (i128::from(x) - i128::from(in_min))
                    .saturating_mul(i128::from(out_max) - i128::from(out_min));
                saturate(floor_div(scaled, span_in).saturating_add(i128::from(out_min)))
            }

            fn to_reading(self) -> Reading {
                Reading::Integer(i64::from(self))
            }
        }

        impl Bounded for $t {
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
        }
    )*};
}

macro_rules! impl_float_sample {
    ($($t:ty),*) => {$(
        impl Sample for $t {
            const ZERO: Self = 0.0;

            fn mean<I>(samples: I) -> Option<Self>
            where
                I: ExactSizeIterator<Item = Self>,
            {
                let len = samples.len();
                if len == 0 {
                    return None;
                }
                let sum: f64 = samples.map(f64::from).sum();
                Some((sum / len as f64) as $t)
            }

            #[allow(clippy::float_cmp)]
            fn interpolate(x: Self, in_min: Self, in_max: Self, out_min: Self, out_max: Self) -> Self {
                if in_max == in_min {
                    return 0.0;
                }
                (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
            }

            fn to_reading(self) -> Reading {
                Reading::Float(f64::from(self))
            }
        }
    )*};
}

impl_integer_sample!(i32, i64);
impl_float_sample!(f32, f64);
