use crate::Fraction;
use thiserror::Error;

/// Failures of the exact arithmetic layer, surfaced at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("euclidean rhythm requires at least one step")]
    ZeroSteps,
}

/// A query arc whose begin lies after its end. A zero-width arc is valid
/// and denotes an instant query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid query span: begin {begin} is after end {end}")]
pub struct InvalidSpanError {
    pub begin: Fraction,
    pub end: Fraction,
}
