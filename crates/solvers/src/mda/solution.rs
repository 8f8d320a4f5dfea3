use mdo_core::Correction;

/// Indicates whether the coupling settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Every block reached its fixed point within tolerance.
    Converged,

    /// A cyclic block used its whole sweep budget.
    MaxSweeps,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of solving a coupled analysis for one design.
#[derive(Debug, Clone)]
pub struct Solution<C> {
    /// Overall status; the worst across blocks.
    pub status: Status,

    /// Coupling variables at the end of the solve.
    pub vars: C,

    /// Sweeps (or Newton iterations) summed over all blocks.
    pub sweeps: usize,

    /// Largest final change across cyclic blocks.
    pub delta: f64,

    /// Number of domain corrections applied during the solve.
    ///
    /// Counted once per sweep or accepted Newton iterate. Finite-difference
    /// evaluations do not count.
    pub corrections: usize,

    /// Corrections still applied in the final sweep of each block.
    ///
    /// A non-empty list means the reported fixed point relies on a domain
    /// policy (for example a reflected negative argument).
    pub active_corrections: Vec<Correction>,
}

impl<C> Solution<C> {
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == Status::Converged
    }
}

/// The output of a coupled analysis called as a model.
#[derive(Debug, Clone, PartialEq)]
pub struct Coupled<C> {
    /// Coupling variables at the fixed point.
    pub vars: C,

    /// Whether the coupling converged. Values are only valid when `true`.
    pub converged: bool,

    /// Sweeps (or Newton iterations) summed over all blocks.
    pub sweeps: usize,

    /// Number of domain corrections applied during the solve.
    pub corrections: usize,

    /// Corrections still applied at the reported fixed point.
    pub active_corrections: Vec<Correction>,
}

impl<C> From<Solution<C>> for Coupled<C> {
    fn from(solution: Solution<C>) -> Self {
        Self {
            converged: solution.is_converged(),
            vars: solution.vars,
            sweeps: solution.sweeps,
            corrections: solution.corrections,
            active_corrections: solution.active_corrections,
        }
    }
}
