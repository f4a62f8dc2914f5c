//! π from the perimeter of regular polygons inscribed in the unit circle.
//!
//! A regular n-gon in the unit circle has side `2·sin(π/n)`, so half its
//! perimeter, `n·sin(π/n)`, approaches π from below. Starting from the hexagon
//! (`sin(π/6) = 1/2`), every iteration doubles `n` with the half-angle identity
//!
//! ```text
//! cos θ      = sqrt(1 - sin²θ)
//! sin(θ/2)   = sqrt((1 - cos θ) / 2)
//! ```
//!
//! Each step needs the previous one, so the loop is strictly sequential; the only
//! parallelism is inside GMP's multiply and divide.

use rug::{Complete, Integer};
use tracing::{debug, debug_span, trace};

use crate::error::{PiError, Result};
use crate::fixed::{real_sqrt, FixedPoint};
use crate::precision::PrecisionConfig;
use crate::render::render;

/// Sine of the current half-angle and how many doublings produced it.
#[derive(Debug)]
struct EngineState {
    h: FixedPoint,
    iteration: u32,
}

impl EngineState {
    fn hexagon(cfg: &PrecisionConfig) -> Self {
        Self {
            h: FixedPoint::from_mantissa((cfg.scale() >> 1u32).complete(), cfg),
            iteration: 0,
        }
    }

    fn double(self, cfg: &PrecisionConfig) -> Result<Self> {
        let underflow = PiError::NumericUnderflow {
            iteration: self.iteration,
        };

        let h_sq = self.h.mul(&self.h, cfg)?;
        let inner = (cfg.scale() - h_sq.mantissa()).complete();
        if inner <= 0 {
            return Err(underflow);
        }
        let cos_theta = real_sqrt(&inner, cfg)?;

        let mut numer = (cfg.scale() - &cos_theta).complete();
        numer >>= 1u32;
        // cos θ rounded up to 1: the angle no longer fits in `shift` bits.
        if numer <= 0 {
            return Err(underflow);
        }
        let h = FixedPoint::from_mantissa(real_sqrt(&numer, cfg)?, cfg);

        trace!(
            iteration = self.iteration,
            h_bits = h.mantissa().significant_bits(),
            "doubled"
        );

        Ok(Self {
            h,
            iteration: self.iteration + 1,
        })
    }

    /// `n·side/2` with `n = 6·2^iteration` and `side = 2h`, at the precision of `h`.
    fn into_estimate(self, cfg: &PrecisionConfig) -> Result<FixedPoint> {
        self.h.check(cfg)?;
        let sides = Integer::from(6) << self.iteration;
        let side = self.h.into_mantissa() << 1u32;
        Ok(FixedPoint::from_mantissa((sides * side) >> 1u32, cfg))
    }
}

/// Final estimate of a run, with the precision needed to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiEstimate {
    value: FixedPoint,
    config: PrecisionConfig,
    iterations: u32,
}

impl PiEstimate {
    pub fn value(&self) -> &FixedPoint {
        &self.value
    }

    pub fn into_value(self) -> FixedPoint {
        self.value
    }

    pub fn config(&self) -> &PrecisionConfig {
        &self.config
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Side count of the final polygon, `6·2^iterations`.
    pub fn sides(&self) -> Integer {
        Integer::from(6) << self.iterations
    }

    pub fn render(&self, digits: usize) -> Result<String> {
        render(&self.value, &self.config, digits)
    }
}

/// Runs the doubling recurrence at a fixed precision.
///
/// With `guard_bits > 0` the recurrence is evaluated with that many extra
/// fractional bits and the estimate is floored back to the configured precision.
#[derive(Debug, Clone)]
pub struct PolygonPiEngine {
    config: PrecisionConfig,
    guard_bits: u32,
}

impl PolygonPiEngine {
    pub fn new(config: PrecisionConfig) -> Self {
        Self {
            config,
            guard_bits: 0,
        }
    }

    pub fn with_guard_bits(mut self, guard_bits: u32) -> Self {
        self.guard_bits = guard_bits;
        self
    }

    pub fn config(&self) -> &PrecisionConfig {
        &self.config
    }

    pub fn compute(&self, iterations: u32) -> Result<PiEstimate> {
        self.compute_with_progress(iterations, |_| {})
    }

    /// Like [`compute`](Self::compute), calling `on_step` with the number of
    /// completed doublings after each one.
    pub fn compute_with_progress<F>(&self, iterations: u32, mut on_step: F) -> Result<PiEstimate>
    where
        F: FnMut(u32),
    {
        let _span = debug_span!(
            "polygon_pi",
            shift = self.config.shift(),
            guard_bits = self.guard_bits,
            iterations
        )
        .entered();

        let work = self.config.widened(self.guard_bits)?;
        let mut state = EngineState::hexagon(&work);

        for _ in 0..iterations {
            state = state.double(&work)?;
            on_step(state.iteration);
        }

        let value = state.into_estimate(&work)?.rescale(&self.config);
        debug!(bits = value.mantissa().significant_bits(), "estimate ready");

        Ok(PiEstimate {
            value,
            config: self.config.clone(),
            iterations,
        })
    }
}

/// π after `iterations` doublings of the hexagon, at `config`'s precision.
pub fn compute(iterations: u32, config: &PrecisionConfig) -> Result<PiEstimate> {
    PolygonPiEngine::new(config.clone()).compute(iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::reference_pi;
    use crate::render::{matching_decimals, to_decimal_string};

    fn cfg(shift: u32) -> PrecisionConfig {
        PrecisionConfig::new(shift).unwrap()
    }

    fn error(estimate: &PiEstimate) -> Integer {
        let pi = reference_pi(estimate.config());
        (pi.mantissa() - estimate.value().mantissa()).complete().abs()
    }

    #[test]
    fn hexagon_is_exactly_three() {
        let c = cfg(64);
        let pi = compute(0, &c).unwrap();
        assert_eq!(*pi.value().mantissa(), Integer::from(3) << 64u32);
        assert_eq!(pi.sides(), 6);
        assert_eq!(pi.render(10).unwrap(), "3.0000000000");
    }

    #[test]
    fn dodecagon() {
        // 12·sin(π/12) = 3.105828541230...
        let pi = compute(1, &cfg(64)).unwrap();
        assert_eq!(pi.sides(), 12);
        assert_eq!(pi.render(12).unwrap(), "3.105828541230");
    }

    #[test]
    fn small_shift_underflows() {
        let err = compute(20, &cfg(8)).unwrap_err();
        assert!(matches!(err, PiError::NumericUnderflow { iteration: 3 }));
    }

    #[test]
    fn shallow_run_fits_small_shift() {
        // 24 sides still fit in 8 fractional bits; the rounding happens to land on 3.
        let pi = compute(2, &cfg(8)).unwrap();
        assert_eq!(pi.render(2).unwrap(), "3.00");
    }

    #[test]
    fn guard_bits_extend_reach() {
        let narrow = cfg(8);
        let guarded = PolygonPiEngine::new(narrow.clone())
            .with_guard_bits(64)
            .compute(3)
            .unwrap();
        assert_eq!(guarded.config(), &narrow);
        assert_eq!(guarded.render(2).unwrap(), "3.13");

        let wide = compute(3, &cfg(72)).unwrap();
        assert_eq!(guarded.value(), &wide.value().rescale(&narrow));
    }

    #[test]
    fn guard_bits_recover_accuracy() {
        // At 64 bits, 25 doublings accumulate enough truncation to overshoot π.
        let c = cfg(64);
        let pi = reference_pi(&c);

        let plain = compute(25, &c).unwrap();
        assert!(plain.value().mantissa() > pi.mantissa());

        let guarded = PolygonPiEngine::new(c.clone())
            .with_guard_bits(64)
            .compute(25)
            .unwrap();
        assert_ne!(guarded.value(), plain.value());
        assert!(guarded.value().mantissa() <= pi.mantissa());
        assert!(error(&guarded) < 4096);
        assert!(error(&guarded) < error(&plain));
    }

    #[test]
    fn state_rejects_foreign_precision() {
        let state = EngineState::hexagon(&cfg(16));
        let err = state.double(&cfg(32)).unwrap_err();
        assert!(matches!(
            err,
            PiError::PrecisionMismatch {
                expected: 32,
                found: 16
            }
        ));
    }

    #[test]
    fn estimates_stay_below_pi() {
        let c = cfg(1024);
        let pi = reference_pi(&c);
        for iterations in [0, 1, 5, 10, 40] {
            let estimate = compute(iterations, &c).unwrap();
            assert!(estimate.value().mantissa() <= pi.mantissa(), "{iterations} iterations");
        }
    }

    #[test]
    fn digits_grow_with_doublings() {
        // Truncation error is about π³/(6n²), so each doubling buys ~0.6 digits.
        let c = cfg(1024);
        let pi = reference_pi(&c).into_mantissa();
        let reference = to_decimal_string(&pi, &c, 300).unwrap();

        for iterations in [1u32, 2, 5, 10, 20, 40] {
            let estimate = compute(iterations, &c).unwrap().render(300).unwrap();
            let matched = matching_decimals(&estimate, &reference);
            let expected = (iterations as usize * 3 / 5).saturating_sub(1);
            assert!(matched >= expected, "{iterations}: {matched} < {expected}");
        }
    }

    #[test]
    fn convergence_is_monotonic() {
        let c = cfg(512);
        let mut previous = error(&compute(0, &c).unwrap());
        for iterations in 1..40 {
            let current = error(&compute(iterations, &c).unwrap());
            assert!(current <= previous, "error grew at iteration {iterations}");
            previous = current;
        }
    }

    #[test]
    fn ten_doublings_at_4096_bits() {
        let c = cfg(4096);
        let digits = c.estimate_precision_digits() as usize;
        let estimate = compute(10, &c).unwrap().render(digits).unwrap();
        let reference = render(&reference_pi(&c), &c, digits).unwrap();

        assert_eq!(estimate.len(), digits + 2);
        // 6144 sides: limited by the polygon, not by the 1233 available digits.
        assert!(matching_decimals(&estimate, &reference) >= 6);
        assert!(estimate.starts_with("3.141592"));
    }

    #[test]
    fn twelve_hundred_digits() {
        let c = cfg(8192);
        let estimate = compute(2000, &c).unwrap().render(1200).unwrap();
        let reference = render(&reference_pi(&c), &c, 1200).unwrap();
        assert_eq!(estimate, reference);
    }

    #[test]
    fn progress_reports_every_doubling() {
        let engine = PolygonPiEngine::new(cfg(256));
        let mut seen = Vec::new();
        let pi = engine.compute_with_progress(5, |done| seen.push(done)).unwrap();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        assert_eq!(pi.iterations(), 5);
        assert_eq!(pi.sides(), 192);
    }

    #[test]
    fn progress_stops_at_underflow() {
        let engine = PolygonPiEngine::new(cfg(8));
        let mut seen = 0;
        let result = engine.compute_with_progress(20, |done| seen = done);
        assert!(result.is_err());
        assert_eq!(seen, 3);
    }
}
