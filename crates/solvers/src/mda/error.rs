use thiserror::Error;

use mdo_core::{DisciplineError, DomainError, GraphError};

/// Errors that can occur while assembling or solving a coupled analysis.
#[derive(Debug, Error)]
pub enum Error {
    /// The declared ports do not form a valid coupling graph.
    #[error("invalid coupling: {0}")]
    Graph(#[from] GraphError),

    /// A discipline input was outside its domain and its policy could not
    /// repair it.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A discipline failed for a reason other than its domain.
    #[error("discipline `{discipline}` failed")]
    Discipline {
        discipline: String,
        #[source]
        source: DisciplineError,
    },

    /// An explicit discipline wrote a coupling variable it does not own.
    #[error("discipline `{discipline}` wrote `{variable}`, which it does not own")]
    Ownership {
        discipline: String,
        variable: &'static str,
    },

    /// An implicit discipline returned the wrong number of residuals.
    #[error("discipline `{discipline}` returned {actual} residuals, expected {expected}")]
    ResidualCount {
        discipline: String,
        expected: usize,
        actual: usize,
    },

    /// A discipline produced `NaN` or an infinite value.
    #[error("discipline `{discipline}` produced a non-finite `{variable}`")]
    NonFinite {
        discipline: String,
        variable: &'static str,
    },

    /// Newton's method met a singular Jacobian.
    #[error("singular Jacobian while solving {disciplines}")]
    SingularJacobian { disciplines: String },

    /// The sweep budget ran out before the coupling settled.
    #[error("coupling did not converge after {sweeps} sweeps (last change {delta:e})")]
    ConvergenceFailure { sweeps: usize, delta: f64 },
}

impl Error {
    /// Attributes a discipline error, lifting domain errors to [`Error::Domain`].
    pub(crate) fn discipline(name: &str, err: DisciplineError) -> Self {
        match err {
            DisciplineError::Domain(e) => Self::Domain(e),
            source @ DisciplineError::Failed(_) => Self::Discipline {
                discipline: name.to_owned(),
                source,
            },
        }
    }
}
