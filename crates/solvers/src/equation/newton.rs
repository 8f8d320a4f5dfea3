//! Newton's method for square systems of equations.
//!
//! # Algorithm
//!
//! Each iteration builds the Jacobian of the residuals with central finite
//! differences, solves `J dx = -r` with a dense LU factorization, and takes
//! the step. If the full step does not reduce the largest absolute residual,
//! the step is halved until it does (up to [`Config::max_halvings`] times);
//! when no trial improves, the full step is taken anyway.
//!
//! The solve converges when the largest absolute residual is at or below
//! [`Config::residual_tol`].
//!
//! # When to Use
//!
//! Newton's method is appropriate when:
//! - The residuals are smooth near the root
//! - A reasonable initial guess is available
//! - The system is small enough that `N` extra residual evaluations per
//!   Jacobian row are affordable
//!
//! The same iteration resolves implicit disciplines and Newton blocks inside
//! a coupled analysis (see [`crate::mda`]).
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] after every iteration. Observers can return
//! [`Action::StopEarly`] to halt with the latest iterate.

mod action;
mod config;
mod error;
mod event;
pub(crate) mod iterate;
mod solution;


pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use mdo_core::{EquationProblem, Model, Observer};

use crate::equation::{EvalError, evaluate};

use iterate::{Failure, iterate};

/// Solves `residuals(x) = 0` with Newton's method, starting from `x0`.
///
/// The observer receives an [`Event`] after each iteration.
///
/// # Errors
///
/// Returns an error if the model or problem fails, if the Jacobian is
/// singular, or if a residual becomes non-finite.
pub fn solve<M, P, Obs, const N: usize>(
    model: &M,
    problem: &P,
    x0: [f64; N],
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: EquationProblem<N, Input = M::Input, Output = M::Output>,
    Obs: Observer<Event<N>, Action>,
{
    let residual = |x: &[f64]| -> Result<Vec<f64>, EvalError<M::Error, P::Error>> {
        let x: [f64; N] = std::array::from_fn(|i| x[i]);
        evaluate(model, problem, x).map(|eval| eval.residuals.to_vec())
    };

    let outcome = iterate(&residual, x0.to_vec(), config, |progress| {
        observer.observe(&Event {
            iter: progress.iter,
            x: std::array::from_fn(|i| progress.x[i]),
            residuals: std::array::from_fn(|i| progress.residuals[i]),
            step_norm: progress.step_norm,
        })
    })
    .map_err(|failure| match failure {
        Failure::Residual(e) => Error::from(e),
        Failure::Singular { iter } => Error::SingularJacobian { iter },
        Failure::NonFinite { iter } => Error::NonFinite { iter },
    })?;

    let x: [f64; N] = std::array::from_fn(|i| outcome.x[i]);
    let eval = evaluate(model, problem, x)?;

    Ok(Solution {
        status: outcome.status,
        x,
        residuals: eval.residuals,
        snapshot: eval.snapshot,
        iters: outcome.iters,
    })
}

/// Solves `residuals(x) = 0` without observer support.
///
/// This is a convenience wrapper around [`solve`] that uses a no-op observer.
///
/// # Errors
///
/// Returns an error if the model or problem fails, if the Jacobian is
/// singular, or if a residual becomes non-finite.
pub fn solve_unobserved<M, P, const N: usize>(
    model: &M,
    problem: &P,
    x0: [f64; N],
    config: &Config,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: EquationProblem<N, Input = M::Input, Output = M::Output>,
{
    solve(model, problem, x0, config, ())
}
