//! Bound- and constraint-aware minimization with L-BFGS.
//!
//! # Algorithm
//!
//! Bounds are removed by reparameterization. Each design value `x` is
//! expressed through an unconstrained parameter `θ`:
//!
//! - a logistic map when both bounds are finite, scaled to unit slope at
//!   the midpoint;
//! - a softplus map when only one is;
//! - the identity when neither is.
//!
//! Every visited design is therefore within bounds by construction.
//!
//! Constraints are handled by an augmented Lagrangian outer loop. Each outer
//! iteration minimizes `f(x) + A(λ, μ, c(x))` over `θ` with argmin's L-BFGS
//! and a Moré–Thuente line search, using central-difference gradients. The
//! multipliers are then updated (inequality multipliers are kept
//! non-negative, equality multipliers are free) and the penalty weight `μ`
//! grows geometrically, up to a cap, while the violation is not falling fast
//! enough.
//!
//! The maps flatten near the bounds, so a small gradient in `θ` does not
//! mean a stationary design. Each inner minimization therefore ends with a
//! projected-gradient check in `x`. An element pressed against a bound while
//! its gradient points inward is moved back to the shoulder of its map and
//! L-BFGS restarts.
//!
//! A design whose inner solve does not converge is priced above the start of
//! the current inner run, so the line search backs away from it. Only an
//! unconverged starting point or accepted iterate is an error.
//!
//! The run converges once the largest constraint violation is at or below
//! [`Config::constraint_tol`] and the last inner minimization passed the
//! stationarity check.
//!
//! # Limitations
//!
//! - A region where the inner solve never converges acts as a wall. Optima
//!   beyond it are only found if a line search happens to step across.
//! - Every gradient costs `2N` evaluations of the model.
//!
//! # Observer Events
//!
//! The driver emits one [`Event`] per outer iteration. Observers can return
//! [`Action::StopEarly`] to stop with that iteration's design.

mod action;
mod config;
mod error;
mod event;
mod inner;
mod penalty;
mod solution;
mod transform;


pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};

use std::cell::Cell;

use mdo_core::{Model, Observer, OptimizationProblem, max_violation};

use crate::optimization::evaluate::evaluate_unchecked;

use penalty::Lagrangian;
use transform::Reparam;

/// Minimizes the problem's objective subject to its bounds and constraints,
/// starting from `x0`.
///
/// The observer receives an [`Event`] after each outer iteration.
///
/// # Errors
///
/// Returns an error if `x0` is out of bounds, if the model or problem fails
/// at any visited design, or if the model's inner solve does not converge at
/// `x0` or at an accepted iterate.
pub fn minimize<M, P, Obs, const N: usize>(
    model: &M,
    problem: &P,
    x0: [f64; N],
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
    Obs: Observer<Event<N>, Action>,
{
    problem.design_space().check(&x0)?;

    let reparam = Reparam::new(problem.design_space());
    let mut lagrangian = Lagrangian::new(problem.constraints(), config);
    let evaluations = Cell::new(0);

    let mut theta = reparam.to_theta(&x0);
    let mut previous = f64::INFINITY;
    let mut outer = 0;

    loop {
        outer += 1;
        let penalty = lagrangian.penalty();
        let minimum = inner::minimize(
            model,
            problem,
            &reparam,
            &lagrangian,
            theta,
            config,
            &evaluations,
        )?;
        theta = minimum.theta;

        let x = reparam.to_x(&theta);
        evaluations.set(evaluations.get() + 1);
        let eval = evaluate_unchecked(model, problem, x)?;
        if !eval.converged {
            return Err(Error::Unconverged { x: x.to_vec() });
        }
        let violation = max_violation(problem.constraints(), &eval.constraints);

        log::debug!(
            "outer {outer}: objective {:.6e}, violation {violation:.3e}, penalty {penalty:.1e}, {} inner iterations",
            eval.objective,
            minimum.iters
        );

        let action = observer.observe(&Event {
            outer,
            x,
            objective: eval.objective,
            constraints: eval.constraints.clone(),
            max_violation: violation,
            penalty,
            inner_iters: minimum.iters,
        });

        let status = if violation <= config.constraint_tol() && minimum.converged {
            log::info!(
                "converged after {outer} outer iterations: objective {:.6e}",
                eval.objective
            );
            Some(Status::Converged)
        } else if matches!(action, Some(Action::StopEarly)) {
            Some(Status::StoppedByObserver)
        } else if outer >= config.max_outer() {
            log::warn!(
                "stopped after {outer} outer iterations with violation {violation:.3e}"
            );
            Some(Status::MaxIters)
        } else {
            None
        };

        if let Some(status) = status {
            return Ok(Solution {
                status,
                x,
                objective: eval.objective,
                constraints: eval.constraints,
                max_violation: violation,
                snapshot: eval.snapshot,
                iters: outer,
                evaluations: evaluations.get(),
            });
        }

        lagrangian.update(&eval.constraints, violation, previous);
        previous = violation;
    }
}

/// Minimizes the problem's objective without observer support.
///
/// This is a convenience wrapper around [`minimize`] that uses a no-op observer.
///
/// # Errors
///
/// Returns an error if `x0` is out of bounds, if the model or problem fails
/// at any visited design, or if the model's inner solve does not converge at
/// `x0` or at an accepted iterate.
pub fn minimize_unobserved<M, P, const N: usize>(
    model: &M,
    problem: &P,
    x0: [f64; N],
    config: &Config,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    minimize(model, problem, x0, config, ())
}
