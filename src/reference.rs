use rug::{float::Constant, Float};

use crate::fixed::FixedPoint;
use crate::precision::PrecisionConfig;

const EXTRA_BITS: u32 = 64;

/// `⌊π · 2^shift⌋`, from MPFR's correctly rounded π with 64 bits to spare.
pub fn reference_pi(cfg: &PrecisionConfig) -> FixedPoint {
    let mut pi = Float::with_val(cfg.shift().saturating_add(EXTRA_BITS), Constant::Pi);
    pi <<= cfg.shift();
    pi.floor_mut();

    // π is finite, so the conversion always succeeds.
    let mantissa = pi.to_integer().unwrap_or_default();
    FixedPoint::from_mantissa(mantissa, cfg)
}
