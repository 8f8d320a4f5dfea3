use mdo_core::{Model, OptimizationProblem};

use crate::differences::jacobian;

use super::evaluate::{EvalError, evaluate, evaluate_unchecked};

/// Derivatives of the objective and constraints at one design point.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient<const N: usize> {
    /// `∂objective / ∂x`.
    pub objective: [f64; N],

    /// One row per declared constraint, `∂constraint / ∂x`.
    pub constraints: Vec<[f64; N]>,
}

/// Computes the objective gradient and constraint Jacobian at `x` by central
/// differences.
///
/// `x` itself must be within bounds. The probes around it may step slightly
/// outside and are not checked. Each probe is evaluated once, so a coupled
/// model is solved `2N` times beyond the base point.
///
/// # Errors
///
/// Returns an error if `x` is out of bounds, if the model's inner solve did
/// not converge at `x`, or if any evaluation fails.
pub fn gradient<M, P, const N: usize>(
    model: &M,
    problem: &P,
    x: [f64; N],
) -> Result<Gradient<N>, EvalError<M::Error, P::Error>>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    let base = evaluate(model, problem, x)?;
    if !base.converged {
        return Err(EvalError::Unconverged { x: x.to_vec() });
    }

    let outputs = |point: &[f64]| -> Result<Vec<f64>, EvalError<M::Error, P::Error>> {
        let x: [f64; N] = std::array::from_fn(|i| point[i]);
        let eval = evaluate_unchecked(model, problem, x)?;
        let mut values = Vec::with_capacity(1 + eval.constraints.len());
        values.push(eval.objective);
        values.extend(eval.constraints);
        Ok(values)
    };

    let rows = 1 + base.constraints.len();
    let matrix = jacobian(&outputs, &x, rows)?;
    let row = |r: usize| -> [f64; N] { std::array::from_fn(|c| matrix[(r, c)]) };

    Ok(Gradient {
        objective: row(0),
        constraints: (1..rows).map(row).collect(),
    })
}
