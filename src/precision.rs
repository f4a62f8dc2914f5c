use std::f64::consts::LOG10_2;

use rug::Integer;

use crate::error::{PiError, Result};

/// Number of fractional bits carried by every fixed-point value, and the scale
/// `2^shift` derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecisionConfig {
    shift: u32,
    scale: Integer,
}

impl PrecisionConfig {
    pub fn new(shift: u32) -> Result<Self> {
        if shift == 0 {
            return Err(PiError::Config("shift must be at least 1".into()));
        }

        Ok(Self {
            shift,
            scale: Integer::from(1) << shift,
        })
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// `2^shift`, the fixed-point representation of 1.
    pub fn scale(&self) -> &Integer {
        &self.scale
    }

    /// The same precision with `guard_bits` extra fractional bits.
    pub fn widened(&self, guard_bits: u32) -> Result<Self> {
        Self::new(widen_shift(self.shift, guard_bits)?)
    }

    pub fn estimate_precision_digits(&self) -> u64 {
        estimate_precision_digits(self.shift)
    }
}

fn widen_shift(shift: u32, guard_bits: u32) -> Result<u32> {
    shift
        .checked_add(guard_bits)
        .ok_or_else(|| PiError::Config(format!("shift {shift} + {guard_bits} overflows")))
}

/// Rough count of decimal digits `shift` fractional bits can hold, `⌊shift·log10(2)⌋`.
///
/// This is advisory: rounding in a long computation eats into it, and the polygon
/// estimate is usually limited by its own truncation error long before this.
pub fn estimate_precision_digits(shift: u32) -> u64 {
    (shift as f64 * LOG10_2) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_is_power_of_two() {
        let cfg = PrecisionConfig::new(64).unwrap();
        assert_eq!(cfg.shift(), 64);
        assert_eq!(*cfg.scale(), Integer::from(u64::MAX) + 1);
    }

    #[test]
    fn zero_shift_is_rejected() {
        assert!(matches!(PrecisionConfig::new(0), Err(PiError::Config(_))));
    }

    #[test]
    fn widened_adds_guard_bits() {
        let cfg = PrecisionConfig::new(100).unwrap().widened(28).unwrap();
        assert_eq!(cfg.shift(), 128);
        assert_eq!(*cfg.scale(), Integer::from(1) << 128u32);
    }

    #[test]
    fn widening_past_u32_is_rejected() {
        assert_eq!(widen_shift(u32::MAX - 1, 1).unwrap(), u32::MAX);
        assert!(matches!(widen_shift(u32::MAX, 1), Err(PiError::Config(_))));
        assert!(matches!(widen_shift(1, u32::MAX), Err(PiError::Config(_))));
    }

    #[test]
    fn precision_digits() {
        assert_eq!(estimate_precision_digits(1), 0);
        assert_eq!(estimate_precision_digits(10), 3);
        assert_eq!(estimate_precision_digits(64), 19);
        assert_eq!(estimate_precision_digits(4096), 1233);
        assert_eq!(PrecisionConfig::new(8192).unwrap().estimate_precision_digits(), 2466);
    }
}
