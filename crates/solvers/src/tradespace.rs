//! Tradespace exploration over a grid of two design values.
//!
//! [`sweep`] holds every design value at a base point except two, steps those
//! two over the values of an [`Axis`] each, and evaluates the problem at
//! every combination. The resulting [`Grid`] records the objective,
//! constraint values, and feasibility of each point. Points whose evaluation
//! failed or did not converge are kept as failures rather than aborting the
//! sweep, since infeasible corners of a tradespace are expected.
//!
//! # Observer Events
//!
//! The sweep emits one [`Event`] per grid point, in row-major order. Observers
//! can return [`Action::StopEarly`] to end the sweep with a partial grid.

mod action;
mod axis;
mod config;
mod error;
mod event;
mod grid;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use axis::{Axis, AxisError};
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use grid::{Grid, Outcome, Point};

use std::error::Error as StdError;

use mdo_core::{Model, Observer, OptimizationProblem};

use crate::optimization::{EvalError, evaluate};

/// Evaluates `problem` at every combination of the `rows` and `columns` axis
/// values, with all other design values taken from `base`.
///
/// # Errors
///
/// Returns an error before any evaluation if an axis names a design value
/// that does not exist, both axes name the same one, or any grid point lies
/// outside the design space.
pub fn sweep<M, P, Obs, const N: usize>(
    model: &M,
    problem: &P,
    base: [f64; N],
    rows: Axis,
    columns: Axis,
    config: &Config,
    mut observer: Obs,
) -> Result<Grid<N>, Error>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
    Obs: for<'a> Observer<Event<'a, N>, Action>,
{
    for axis in [&rows, &columns] {
        if axis.index() >= N {
            return Err(Error::AxisIndex {
                index: axis.index(),
                len: N,
            });
        }
    }
    if rows.index() == columns.index() {
        return Err(Error::SameAxis(rows.index()));
    }

    let mut designs = Vec::with_capacity(rows.len() * columns.len());
    for &r in rows.values() {
        for &c in columns.values() {
            let mut x = base;
            x[rows.index()] = r;
            x[columns.index()] = c;
            problem.design_space().check(&x)?;
            designs.push(x);
        }
    }

    let width = columns.len();
    let mut grid = Grid::new(rows, columns);
    for (position, x) in designs.into_iter().enumerate() {
        let outcome = match evaluate(model, problem, x) {
            Ok(eval) if eval.converged => {
                let max_violation = eval.max_violation(problem);
                Outcome::Evaluated {
                    objective: eval.objective,
                    feasible: max_violation <= config.feasibility_tol(),
                    constraints: eval.constraints,
                    max_violation,
                }
            }
            Ok(_) => Outcome::Failed {
                reason: "inner solve did not converge".to_string(),
            },
            Err(err) => Outcome::Failed {
                reason: describe(&err),
            },
        };
        if let Outcome::Failed { reason } = &outcome {
            log::debug!("tradespace point {x:?} failed: {reason}");
        }

        let point = grid.push(Point { x, outcome });
        let event = Event {
            row: position / width,
            column: position % width,
            point,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            break;
        }
    }

    let failures = grid.failures();
    if failures > 0 {
        log::warn!(
            "{failures} of {} tradespace points failed to evaluate",
            grid.points().len()
        );
    }

    Ok(grid)
}

/// Sweeps the grid without observer support.
///
/// This is a convenience wrapper around [`sweep`] that uses a no-op observer.
///
/// # Errors
///
/// Returns an error under the same conditions as [`sweep`].
pub fn sweep_unobserved<M, P, const N: usize>(
    model: &M,
    problem: &P,
    base: [f64; N],
    rows: Axis,
    columns: Axis,
    config: &Config,
) -> Result<Grid<N>, Error>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    sweep(model, problem, base, rows, columns, config, ())
}

/// Renders an evaluation error with its chain of sources.
fn describe<ME, PE>(err: &EvalError<ME, PE>) -> String
where
    ME: StdError + 'static,
    PE: StdError + 'static,
{
    let mut reason = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    reason
}
