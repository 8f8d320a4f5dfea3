use mdo_core::Snapshot;

/// Indicates whether the solver converged or hit the iteration limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The residual norm reached the configured tolerance.
    Converged,

    /// Reached the iteration limit without converging.
    MaxIters,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of a Newton solve.
#[derive(Debug, Clone)]
pub struct Solution<I, O, const N: usize> {
    /// Final solver status.
    pub status: Status,

    /// The final iterate.
    pub x: [f64; N],

    /// Residuals at `x`.
    pub residuals: [f64; N],

    /// Snapshot at `x`.
    pub snapshot: Snapshot<I, O>,

    /// Iterations taken.
    pub iters: usize,
}
