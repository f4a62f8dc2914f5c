use thiserror::Error;

pub type Result<T> = std::result::Result<T, PiError>;

#[derive(Error, Debug)]
pub enum PiError {
    /// Invalid precision or digit count, or operands bound to different precisions.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("precision mismatch: operand has {found} fractional bits, expected {expected}")]
    PrecisionMismatch { expected: u32, found: u32 },

    /// Negative square root operand or zero denominator.
    #[error("domain error: {0}")]
    Domain(String),

    /// The fixed-point representation ran out of resolution during the recurrence.
    /// Retrying with a larger shift is the only recovery.
    #[error("numeric underflow at iteration {iteration}; increase the shift")]
    NumericUnderflow { iteration: u32 },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underflow_message_names_iteration() {
        let err = PiError::NumericUnderflow { iteration: 3 };
        assert_eq!(
            err.to_string(),
            "numeric underflow at iteration 3; increase the shift"
        );
    }

    #[test]
    fn mismatch_message() {
        let err = PiError::PrecisionMismatch {
            expected: 64,
            found: 32,
        };
        assert_eq!(
            err.to_string(),
            "precision mismatch: operand has 32 fractional bits, expected 64"
        );
    }
}
