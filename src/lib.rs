//! π by polygon doubling in binary fixed point.
//!
//! Values are `rug::Integer` mantissas read as `mantissa / 2^shift`. Starting
//! from the inscribed hexagon, each iteration doubles the side count with the
//! half-angle identity, using nothing but multiply, shift, subtract and an integer
//! square root.
//!
//! ```
//! use polygon_pi::{compute, PrecisionConfig};
//!
//! let cfg = PrecisionConfig::new(256).unwrap();
//! let pi = compute(20, &cfg).unwrap();
//! assert!(pi.render(10).unwrap().starts_with("3.1415926"));
//! ```
//!
//! Correct digits are bounded twice: by the precision (about `shift·log10(2)`
//! digits, minus rounding accumulated over the iterations) and by the polygon
//! itself (about `2·log10(n)` digits for `n` sides). Too small a `shift` for the
//! requested depth fails with [`PiError::NumericUnderflow`].

pub mod bench;
pub mod error;
pub mod fixed;
pub mod isqrt;
pub mod polygon;
pub mod precision;
pub mod reference;
pub mod render;

pub use bench::{BenchmarkRun, BenchmarkRunner};
pub use error::{PiError, Result};
pub use fixed::FixedPoint;
pub use polygon::{compute, PiEstimate, PolygonPiEngine};
pub use precision::{estimate_precision_digits, PrecisionConfig};
pub use render::render;
