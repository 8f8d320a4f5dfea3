use thiserror::Error;

use mdo_core::BoundsViolation;

/// Errors that stop a sweep before it starts.
#[derive(Debug, Error)]
pub enum Error {
    /// An axis names a design value past the end of the design.
    #[error("axis index {index} is outside a design of {len} values")]
    AxisIndex { index: usize, len: usize },

    /// Both axes name the same design value.
    #[error("both axes sweep design value {0}")]
    SameAxis(usize),

    /// A grid point lies outside the design space.
    #[error(transparent)]
    Bounds(#[from] BoundsViolation),
}
