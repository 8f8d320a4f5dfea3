/// Emitted after every Newton iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event<const N: usize> {
    /// Iteration number, starting at 1.
    pub iter: usize,

    /// The iterate after the step.
    pub x: [f64; N],

    /// Residuals at `x`.
    pub residuals: [f64; N],

    /// Largest absolute component of the step taken.
    pub step_norm: f64,
}

impl<const N: usize> Event<N> {
    /// The largest absolute residual at `x`.
    #[must_use]
    pub fn residual_norm(&self) -> f64 {
        crate::equation::evaluate::max_abs(&self.residuals)
    }
}
