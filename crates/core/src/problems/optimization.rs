use crate::{Constraint, DesignSpace};

/// Defines a bounded, optionally constrained minimization problem.
///
/// An optimization problem gives solver variables their meaning through a
/// [`DesignSpace`], maps them to a model input, and reads the objective and
/// constraint values back out of the model output. Solvers search for the
/// `x` within bounds that minimizes the objective while satisfying every
/// declared [`Constraint`].
///
/// The const generic `N` is the number of scalar design values.
pub trait OptimizationProblem<const N: usize> {
    type Input;
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// The named design variables and their bounds.
    fn design_space(&self) -> &DesignSpace<N>;

    /// Declared constraints, in the order of [`constraint_values`].
    ///
    /// Defaults to none.
    ///
    /// [`constraint_values`]: Self::constraint_values
    fn constraints(&self) -> &[Constraint] {
        &[]
    }

    /// Maps solver variables (`x`) into a model input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the input cannot be constructed from `x`.
    fn input(&self, x: &[f64; N]) -> Result<Self::Input, Self::Error>;

    /// Computes the objective to minimize.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the objective cannot be computed.
    fn objective(&self, input: &Self::Input, output: &Self::Output) -> Result<f64, Self::Error>;

    /// Computes one value per declared constraint.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the constraint values cannot be computed.
    fn constraint_values(
        &self,
        _input: &Self::Input,
        _output: &Self::Output,
    ) -> Result<Vec<f64>, Self::Error> {
        Ok(Vec::new())
    }

    /// Whether `output` came from a converged inner solve.
    ///
    /// Problems over coupled analyses report the analysis status here so that
    /// callers can refuse to trust unconverged values. Defaults to `true`.
    fn converged(&self, _input: &Self::Input, _output: &Self::Output) -> bool {
        true
    }
}
