use nalgebra::{DMatrix, DVector};

use crate::{differences::jacobian, equation::evaluate::max_abs};

use super::{Action, Config, Status};

/// Why the iteration could not continue.
#[derive(Debug)]
pub(crate) enum Failure<E> {
    /// The residual function returned an error.
    Residual(E),

    /// The Jacobian could not be factored.
    Singular { iter: usize },

    /// A residual came back `NaN` or infinite.
    NonFinite { iter: usize },
}

/// State reported after each accepted step.
pub(crate) struct Progress<'a> {
    pub iter: usize,
    pub x: &'a [f64],
    pub residuals: &'a [f64],
    pub step_norm: f64,
}

/// Where the iteration ended.
#[derive(Debug, Clone)]
pub(crate) struct Outcome {
    pub status: Status,
    pub x: Vec<f64>,
    pub residuals: Vec<f64>,
    pub iters: usize,

    /// Largest absolute component of the last step, zero if none was taken.
    pub step_norm: f64,
}

/// Runs Newton's method on a square system of any size.
///
/// The Jacobian is built one row at a time with central differences. Each
/// step is halved (up to the configured limit) until the residual norm
/// drops; if no trial improves, the full step is taken.
pub(crate) fn iterate<F, E, C>(
    residual: &F,
    x0: Vec<f64>,
    config: &Config,
    mut progress: C,
) -> Result<Outcome, Failure<E>>
where
    F: Fn(&[f64]) -> Result<Vec<f64>, E>,
    C: FnMut(&Progress<'_>) -> Option<Action>,
{
    let mut x = x0;
    let mut r = residual(&x).map_err(Failure::Residual)?;
    let mut norm = max_abs(&r);
    let mut step_norm = 0.0;

    if !norm.is_finite() {
        return Err(Failure::NonFinite { iter: 0 });
    }
    if norm <= config.residual_tol() {
        return Ok(Outcome {
            status: Status::Converged,
            x,
            residuals: r,
            iters: 0,
            step_norm: 0.0,
        });
    }

    for iter in 1..=config.max_iters() {
        let jacobian = jacobian(residual, &x, r.len()).map_err(Failure::Residual)?;
        let step = solve_linear(jacobian, &r).ok_or(Failure::Singular { iter })?;
        let (x_next, r_next) = backtrack(residual, &x, &step, norm, config.max_halvings())
            .map_err(Failure::Residual)?;

        step_norm = max_abs(
            &x_next
                .iter()
                .zip(&x)
                .map(|(next, prev)| next - prev)
                .collect::<Vec<_>>(),
        );
        x = x_next;
        r = r_next;
        norm = max_abs(&r);

        if !norm.is_finite() {
            return Err(Failure::NonFinite { iter });
        }

        log::trace!("newton iter {iter}: residual {norm:.3e}, step {step_norm:.3e}");

        let action = progress(&Progress {
            iter,
            x: &x,
            residuals: &r,
            step_norm,
        });

        if norm <= config.residual_tol() {
            return Ok(Outcome {
                status: Status::Converged,
                x,
                residuals: r,
                iters: iter,
                step_norm,
            });
        }
        if matches!(action, Some(Action::StopEarly)) {
            return Ok(Outcome {
                status: Status::StoppedByObserver,
                x,
                residuals: r,
                iters: iter,
                step_norm,
            });
        }
    }

    Ok(Outcome {
        status: Status::MaxIters,
        x,
        residuals: r,
        iters: config.max_iters(),
        step_norm,
    })
}

/// Solves `J dx = -r`. Returns `None` for a non-square or singular `J`.
fn solve_linear(jacobian: DMatrix<f64>, r: &[f64]) -> Option<Vec<f64>> {
    if !jacobian.is_square() || jacobian.nrows() != r.len() {
        return None;
    }
    let rhs = DVector::from_iterator(r.len(), r.iter().map(|v| -v));
    let step = jacobian.lu().solve(&rhs)?;
    step.iter()
        .all(|v| v.is_finite())
        .then(|| step.iter().copied().collect())
}

/// Halves the step until the residual norm drops below `norm`.
fn backtrack<F, E>(
    residual: &F,
    x: &[f64],
    step: &[f64],
    norm: f64,
    max_halvings: usize,
) -> Result<(Vec<f64>, Vec<f64>), E>
where
    F: Fn(&[f64]) -> Result<Vec<f64>, E>,
{
    let mut full_step: Option<Result<(Vec<f64>, Vec<f64>), E>> = None;
    let mut alpha = 1.0;

    for _ in 0..=max_halvings {
        let trial: Vec<f64> = x.iter().zip(step).map(|(xi, di)| xi + alpha * di).collect();
        let result = residual(&trial);

        if let Ok(values) = &result {
            let trial_norm = max_abs(values);
            if trial_norm.is_finite() && trial_norm < norm {
                return result.map(|values| (trial, values));
            }
        }
        if full_step.is_none() {
            full_step = Some(result.map(|values| (trial, values)));
        }
        alpha *= 0.5;
    }

    match full_step {
        Some(result) => result,
        None => residual(x).map(|values| (x.to_vec(), values)),
    }
}
