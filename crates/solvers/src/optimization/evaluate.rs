use thiserror::Error;

use mdo_core::{BoundsViolation, Model, OptimizationProblem, Snapshot, max_violation};

/// The result of evaluating an optimization problem at a given `x`.
#[derive(Debug, Clone)]
pub struct Evaluation<I, O, const N: usize> {
    pub x: [f64; N],

    pub objective: f64,

    /// One value per declared constraint, in declaration order.
    pub constraints: Vec<f64>,

    /// Whether the model's inner solve converged.
    ///
    /// Objective and constraint values must not be trusted when `false`.
    pub converged: bool,

    pub snapshot: Snapshot<I, O>,
}

impl<I, O, const N: usize> Evaluation<I, O, N> {
    /// Largest constraint violation under `problem`'s declarations.
    pub fn max_violation<P: OptimizationProblem<N>>(&self, problem: &P) -> f64 {
        max_violation(problem.constraints(), &self.constraints)
    }
}

/// Errors that can occur when evaluating an optimization problem.
#[derive(Debug, Error)]
pub enum EvalError<ME, PE> {
    /// `x` lies outside the design space.
    #[error(transparent)]
    Bounds(BoundsViolation),

    /// The model call failed.
    #[error("model call failed")]
    Model(#[source] ME),

    /// Failed to construct input or compute the objective or constraints.
    #[error("problem error")]
    Problem(#[source] PE),

    /// The problem returned a different number of constraint values than it
    /// declares.
    #[error("problem returned {actual} constraint values, expected {expected}")]
    ConstraintCount { expected: usize, actual: usize },

    /// The model's inner solve did not converge at `x`.
    ///
    /// [`evaluate`] reports this through [`Evaluation::converged`] instead;
    /// only callers that need a settled point return it.
    #[error("inner solve did not converge at {x:?}")]
    Unconverged { x: Vec<f64> },
}

/// Type alias for the result of [`evaluate`].
pub type EvaluateResult<M, P, const N: usize> = Result<
    Evaluation<<M as Model>::Input, <M as Model>::Output, N>,
    EvalError<<M as Model>::Error, <P as OptimizationProblem<N>>::Error>,
>;

/// Evaluates the model in the context of an optimization problem.
///
/// This function checks `x` against the design space, maps it to model
/// input, calls the model, then computes the objective and constraint values
/// from the input and output.
///
/// # Errors
///
/// Returns an error if `x` is out of bounds, or if input mapping, the model
/// call, or objective or constraint computation fails.
pub fn evaluate<M, P, const N: usize>(
    model: &M,
    problem: &P,
    x: [f64; N],
) -> EvaluateResult<M, P, N>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    problem.design_space().check(&x).map_err(EvalError::Bounds)?;
    evaluate_unchecked(model, problem, x)
}

/// Evaluates without the bounds check.
///
/// Finite-difference probes around a point on a bound step slightly outside
/// it; they go through here.
pub(crate) fn evaluate_unchecked<M, P, const N: usize>(
    model: &M,
    problem: &P,
    x: [f64; N],
) -> EvaluateResult<M, P, N>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    let input = problem.input(&x).map_err(EvalError::Problem)?;
    let output = model.call(&input).map_err(EvalError::Model)?;
    let objective = problem
        .objective(&input, &output)
        .map_err(EvalError::Problem)?;
    let constraints = problem
        .constraint_values(&input, &output)
        .map_err(EvalError::Problem)?;

    let expected = problem.constraints().len();
    if constraints.len() != expected {
        return Err(EvalError::ConstraintCount {
            expected,
            actual: constraints.len(),
        });
    }

    let converged = problem.converged(&input, &output);

    Ok(Evaluation {
        x,
        objective,
        constraints,
        converged,
        snapshot: Snapshot::new(input, output),
    })
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use approx::assert_relative_eq;
    use mdo_core::{Constraint, DesignSpace};

    use super::*;

    struct Identity;

    impl Model for Identity {
        type Input = [f64; 2];
        type Output = [f64; 2];
        type Error = Infallible;

        fn call(&self, input: &[f64; 2]) -> Result<[f64; 2], Infallible> {
            Ok(*input)
        }
    }

    /// Minimize `x + y` subject to `x - y <= 1` on `[0, 2]²`.
    struct Sum {
        space: DesignSpace<2>,
        constraints: Vec<Constraint>,
    }

    impl Sum {
        fn new() -> Self {
            Self {
                space: DesignSpace::builder()
                    .scalar("x", 0.0, 2.0)
                    .scalar("y", 0.0, 2.0)
                    .build()
                    .expect("valid space"),
                constraints: vec![Constraint::upper("gap", 1.0)],
            }
        }
    }

    impl OptimizationProblem<2> for Sum {
        type Input = [f64; 2];
        type Output = [f64; 2];
        type Error = Infallible;

        fn design_space(&self) -> &DesignSpace<2> {
            &self.space
        }

        fn constraints(&self) -> &[Constraint] {
            &self.constraints
        }

        fn input(&self, x: &[f64; 2]) -> Result<[f64; 2], Infallible> {
            Ok(*x)
        }

        fn objective(&self, _input: &[f64; 2], output: &[f64; 2]) -> Result<f64, Infallible> {
            Ok(output[0] + output[1])
        }

        fn constraint_values(
            &self,
            _input: &[f64; 2],
            output: &[f64; 2],
        ) -> Result<Vec<f64>, Infallible> {
            Ok(vec![output[0] - output[1]])
        }
    }

    #[test]
    fn reports_objective_and_constraints() {
        let problem = Sum::new();
        let eval = evaluate(&Identity, &problem, [2.0, 0.5]).expect("in bounds");

        assert_relative_eq!(eval.objective, 2.5);
        assert_eq!(eval.constraints, vec![1.5]);
        assert!(eval.converged);
        assert_relative_eq!(eval.max_violation(&problem), 0.5);
    }

    #[test]
    fn points_on_the_bounds_are_accepted() {
        assert!(evaluate(&Identity, &Sum::new(), [0.0, 2.0]).is_ok());
    }

    #[test]
    fn points_past_the_bounds_are_rejected() {
        let result = evaluate(&Identity, &Sum::new(), [3.0, 1.0]);
        let Err(EvalError::Bounds(violation)) = result else {
            panic!("expected a bounds violation");
        };
        assert_eq!(violation.label, "x");
        assert_eq!(violation.index, 0);
    }
}
