use mdo_core::Snapshot;

/// Indicates how the optimization run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Constraints are satisfied within tolerance and the inner minimization
    /// converged.
    Converged,

    /// Reached the outer iteration limit.
    MaxIters,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of an optimization run.
#[derive(Debug, Clone)]
pub struct Solution<I, O, const N: usize> {
    pub status: Status,

    /// The final design, within bounds.
    pub x: [f64; N],

    pub objective: f64,

    /// Constraint values at `x`, in declaration order.
    pub constraints: Vec<f64>,

    pub max_violation: f64,

    /// Snapshot at `x`.
    pub snapshot: Snapshot<I, O>,

    /// Outer iterations taken.
    pub iters: usize,

    /// Model evaluations, finite-difference probes included.
    pub evaluations: usize,
}

impl<I, O, const N: usize> Solution<I, O, N> {
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == Status::Converged
    }
}
