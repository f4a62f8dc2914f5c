//! Binary fixed-point arithmetic: a value is an integer mantissa read as
//! `mantissa / 2^shift`.
//!
//! The free functions work on bare mantissas and are what the engine's hot loop
//! calls. [`FixedPoint`] carries the shift it was made with and refuses to mix
//! with values of another precision.

use std::cmp::Ordering;

use rug::{Complete, Integer};

use crate::error::{PiError, Result};
use crate::isqrt::isqrt;
use crate::precision::PrecisionConfig;

/// `num/den` scaled by `2^shift`, rounded toward negative infinity.
pub fn from_rational(num: &Integer, den: &Integer, cfg: &PrecisionConfig) -> Result<Integer> {
    if den.cmp0() == Ordering::Equal {
        return Err(PiError::Domain("zero denominator".into()));
    }

    let scaled = (num << cfg.shift()).complete();
    let (quotient, _) = scaled.div_rem_floor(den.clone());
    Ok(quotient)
}

/// `(a·b) >> shift`. Truncates toward negative infinity, so each call loses
/// at most one unit in the last place.
pub fn multiply(a: &Integer, b: &Integer, cfg: &PrecisionConfig) -> Integer {
    let mut product = (a * b).complete();
    product >>= cfg.shift();
    product
}

/// Square root of a non-negative fixed-point value, `isqrt(x · 2^shift)`.
pub fn real_sqrt(x: &Integer, cfg: &PrecisionConfig) -> Result<Integer> {
    if x.cmp0() == Ordering::Less {
        return Err(PiError::Domain(format!("square root of negative fixed-point value {x}")));
    }

    isqrt(&(x << cfg.shift()).complete())
}

/// A fixed-point number bound to the precision it was created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPoint {
    mantissa: Integer,
    shift: u32,
}

impl FixedPoint {
    pub fn from_mantissa(mantissa: Integer, cfg: &PrecisionConfig) -> Self {
        Self {
            mantissa,
            shift: cfg.shift(),
        }
    }

    pub fn from_integer(n: impl Into<Integer>, cfg: &PrecisionConfig) -> Self {
        let n: Integer = n.into();
        Self::from_mantissa(n << cfg.shift(), cfg)
    }

    pub fn from_rational(
        num: impl Into<Integer>,
        den: impl Into<Integer>,
        cfg: &PrecisionConfig,
    ) -> Result<Self> {
        let (num, den): (Integer, Integer) = (num.into(), den.into());
        let mantissa = from_rational(&num, &den, cfg)?;
        Ok(Self::from_mantissa(mantissa, cfg))
    }

    pub fn mantissa(&self) -> &Integer {
        &self.mantissa
    }

    pub fn into_mantissa(self) -> Integer {
        self.mantissa
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// Fails unless `self` was made with `cfg`'s precision.
    pub fn check(&self, cfg: &PrecisionConfig) -> Result<()> {
        if self.shift != cfg.shift() {
            return Err(PiError::PrecisionMismatch {
                expected: cfg.shift(),
                found: self.shift,
            });
        }
        Ok(())
    }

    pub fn mul(&self, other: &Self, cfg: &PrecisionConfig) -> Result<Self> {
        self.check(cfg)?;
        other.check(cfg)?;
        Ok(Self::from_mantissa(multiply(&self.mantissa, &other.mantissa, cfg), cfg))
    }

    pub fn sub(&self, other: &Self, cfg: &PrecisionConfig) -> Result<Self> {
        self.check(cfg)?;
        other.check(cfg)?;
        let diff = (&self.mantissa - &other.mantissa).complete();
        Ok(Self::from_mantissa(diff, cfg))
    }

    pub fn sqrt(&self, cfg: &PrecisionConfig) -> Result<Self> {
        self.check(cfg)?;
        let root = real_sqrt(&self.mantissa, cfg)?;
        Ok(Self::from_mantissa(root, cfg))
    }

    /// Re-express at another precision. Widening is exact; narrowing floors.
    pub fn rescale(&self, to: &PrecisionConfig) -> Self {
        let mantissa = match to.shift().cmp(&self.shift) {
            Ordering::Greater => (&self.mantissa << (to.shift() - self.shift)).complete(),
            Ordering::Less => (&self.mantissa >> (self.shift - to.shift())).complete(),
            Ordering::Equal => self.mantissa.clone(),
        };
        Self::from_mantissa(mantissa, to)
    }
}
