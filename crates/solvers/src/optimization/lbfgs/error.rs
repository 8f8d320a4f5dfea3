use std::error::Error as StdError;

use thiserror::Error;

use mdo_core::BoundsViolation;

use crate::optimization::EvalError;

/// Errors that can occur during an optimization run.
#[derive(Debug, Error)]
pub enum Error {
    /// The starting point is outside the design space.
    #[error(transparent)]
    Bounds(#[from] BoundsViolation),

    #[error("model call failed")]
    Model(#[source] Box<dyn StdError + Send + Sync>),

    #[error("problem error")]
    Problem(#[source] Box<dyn StdError + Send + Sync>),

    #[error("problem returned {actual} constraint values, expected {expected}")]
    ConstraintCount { expected: usize, actual: usize },

    /// The model's inner solve did not converge at the start or at an
    /// accepted iterate.
    #[error("inner solve did not converge at {x:?}")]
    Unconverged { x: Vec<f64> },

    /// The L-BFGS solver rejected its settings.
    #[error("invalid inner optimizer settings: {0}")]
    Setup(String),
}

impl<ME, PE> From<EvalError<ME, PE>> for Error
where
    ME: StdError + Send + Sync + 'static,
    PE: StdError + Send + Sync + 'static,
{
    fn from(err: EvalError<ME, PE>) -> Self {
        match err {
            EvalError::Bounds(e) => Self::Bounds(e),
            EvalError::Model(e) => Self::Model(Box::new(e)),
            EvalError::Problem(e) => Self::Problem(Box::new(e)),
            EvalError::ConstraintCount { expected, actual } => {
                Self::ConstraintCount { expected, actual }
            }
            EvalError::Unconverged { x } => Self::Unconverged { x },
        }
    }
}
