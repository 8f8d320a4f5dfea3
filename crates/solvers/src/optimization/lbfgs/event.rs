/// Emitted after every outer (augmented Lagrangian) iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<const N: usize> {
    /// Outer iteration number, starting at 1.
    pub outer: usize,

    /// The design at the end of the inner minimization.
    pub x: [f64; N],

    /// Objective at `x`.
    pub objective: f64,

    /// Constraint values at `x`, in declaration order.
    pub constraints: Vec<f64>,

    /// Largest constraint violation at `x`.
    pub max_violation: f64,

    /// Penalty weight used for the inner minimization.
    pub penalty: f64,

    /// L-BFGS iterations taken by the inner minimization.
    pub inner_iters: usize,
}
