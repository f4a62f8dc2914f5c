use rug::{Complete, Integer};

use crate::error::{PiError, Result};
use crate::fixed::FixedPoint;
use crate::precision::PrecisionConfig;

/// Decimal rendering of a fixed-point mantissa with exactly `digits` fractional
/// digits, truncated rather than rounded.
///
/// Negative values print as `-` followed by the rendering of their magnitude, so
/// `-0.5` is `"-0.5000"` rather than the floored `-1` integer part plus `.5`.
/// With `digits == 0` there is no decimal point.
///
/// Only about `⌊shift·log10(2)⌋` digits carry information; asking for more pads
/// the tail with digits that mean nothing. See
/// [`estimate_precision_digits`](crate::precision::estimate_precision_digits).
pub fn to_decimal_string(x: &Integer, cfg: &PrecisionConfig, digits: usize) -> Result<String> {
    let exponent = u32::try_from(digits)
        .map_err(|_| PiError::Config(format!("cannot render {digits} digits")))?;
    let shift = cfg.shift();

    let magnitude = x.clone().abs();
    let integer_part = (&magnitude >> shift).complete();
    let frac_mantissa = magnitude - (&integer_part << shift).complete();

    let mut out = String::with_capacity(digits + 8);
    if x.is_negative() {
        out.push('-');
    }
    out.push_str(&integer_part.to_string());

    if digits > 0 {
        let mut frac_digits = frac_mantissa * Integer::u_pow_u(10, exponent).complete();
        frac_digits >>= shift;

        let frac = frac_digits.to_string();
        out.push('.');
        for _ in frac.len()..digits {
            out.push('0');
        }
        out.push_str(&frac);
    }

    Ok(out)
}

/// [`to_decimal_string`] for a value that must belong to `cfg`.
pub fn render(value: &FixedPoint, cfg: &PrecisionConfig, digits: usize) -> Result<String> {
    value.check(cfg)?;
    to_decimal_string(value.mantissa(), cfg, digits)
}

/// How many fractional digits two renderings agree on before they first differ.
/// Zero when the integer parts already disagree.
pub fn matching_decimals(a: &str, b: &str) -> usize {
    let common = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();

    match a.find('.') {
        Some(point) if common > point => common - point - 1,
        _ => 0,
    }
}
