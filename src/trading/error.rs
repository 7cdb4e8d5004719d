//! Error kinds for the pure trading calculations.

use thiserror::Error;

/// Failure of a sizing, order-construction, or signal calculation.
///
/// None of these are fatal: every variant is returned to the immediate
/// caller, which decides whether to skip the trade or fix its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TradeCalcError {
    /// A parameter was outside its valid range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The price window is too short for the requested computation.
    #[error("insufficient data: need at least {required} closes, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Broker constraints cannot be satisfied by the computed value.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type TradeCalcResult<T> = Result<T, TradeCalcError>;
