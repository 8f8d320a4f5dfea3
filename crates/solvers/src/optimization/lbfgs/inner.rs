use std::cell::{Cell, RefCell};

use argmin::{
    core::{CostFunction, Executor, Gradient, State},
    solver::{linesearch::MoreThuenteLineSearch, quasinewton::LBFGS},
};
use finitediff::FiniteDiff;

use mdo_core::{Model, OptimizationProblem};

use crate::optimization::evaluate::evaluate_unchecked;

use super::{Config, Error, penalty::Lagrangian, transform::Reparam};

/// Fresh L-BFGS runs allowed after one ends away from a stationary point.
const RESTARTS: usize = 3;

/// Everything needed to price a design under the current multipliers.
struct Context<'a, M, P, const N: usize> {
    model: &'a M,
    problem: &'a P,
    reparam: &'a Reparam<N>,
    lagrangian: &'a Lagrangian,
    config: &'a Config,
    evaluations: &'a Cell<usize>,
}

/// How far a point is from stationary over the box.
struct Stationarity {
    /// Largest component of `P(x - ∇L) - x`.
    measure: f64,
    tol: f64,

    /// Elements held against a bound by a saturated map while the gradient
    /// points inward.
    stuck: Vec<usize>,
}

impl Stationarity {
    /// Some probe did not converge, so the gradient is unknown.
    fn unknown() -> Self {
        Self {
            measure: f64::INFINITY,
            tol: 0.0,
            stuck: Vec::new(),
        }
    }

    fn is_stationary(&self) -> bool {
        self.measure <= self.tol
    }
}

impl<M, P, const N: usize> Context<'_, M, P, N>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    /// The augmented cost at `x`, or `None` if the model's inner solve did
    /// not converge there.
    fn cost_at(&self, x: [f64; N]) -> Result<Option<f64>, Error> {
        self.evaluations.set(self.evaluations.get() + 1);
        let eval = evaluate_unchecked(self.model, self.problem, x)?;
        Ok(eval
            .converged
            .then(|| eval.objective + self.lagrangian.augment(&eval.constraints)))
    }

    /// Checks `θ` against the projected gradient of the augmented cost in
    /// design space.
    fn stationarity(&self, theta: &[f64]) -> Result<Stationarity, Error> {
        let x = self.reparam.to_x(theta);
        let Some(cost) = self.cost_at(x)? else {
            return Ok(Stationarity::unknown());
        };

        let failure: RefCell<Option<Error>> = RefCell::new(None);
        let unsettled = Cell::new(false);
        let probe = |point: &Vec<f64>| -> f64 {
            match self.cost_at(std::array::from_fn(|i| point[i])) {
                Ok(Some(cost)) => cost,
                Ok(None) => {
                    unsettled.set(true);
                    f64::NAN
                }
                Err(e) => {
                    failure.borrow_mut().get_or_insert(e);
                    f64::NAN
                }
            }
        };
        let gradient = x.to_vec().central_diff(&probe);
        if let Some(e) = failure.into_inner() {
            return Err(e);
        }
        if unsettled.get() || gradient.iter().any(|g| !g.is_finite()) {
            return Ok(Stationarity::unknown());
        }

        let projected = self.reparam.project(&x, &gradient);
        let steps: Vec<f64> = projected.iter().zip(&x).map(|(p, v)| (p - v).abs()).collect();
        let tol = self.config.stationarity_tol() * cost.abs().max(1.0);
        let stuck = (0..N)
            .filter(|&i| steps[i] > tol && self.reparam.is_saturated(theta, i))
            .collect();

        Ok(Stationarity {
            measure: steps.into_iter().fold(0.0, f64::max),
            tol,
            stuck,
        })
    }
}

/// The augmented objective over unconstrained parameters `θ`.
///
/// argmin only sees `θ`. Designs whose inner solve does not converge cost
/// `ceiling`, which is above every accepted iterate of the run, so line
/// searches back away from them. Evaluation errors are kept aside in
/// `failure` and reported to argmin as a plain message; the caller recovers
/// the typed error afterwards.
struct Augmented<'a, M, P, const N: usize> {
    context: &'a Context<'a, M, P, N>,
    ceiling: f64,
    failure: &'a RefCell<Option<Error>>,

    /// Lowest converged `(θ, cost)` seen so far.
    best: &'a RefCell<Option<(Vec<f64>, f64)>>,
}

impl<M, P, const N: usize> Augmented<'_, M, P, N>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    fn value(&self, theta: &[f64]) -> Result<f64, Error> {
        let x = self.context.reparam.to_x(theta);
        let Some(cost) = self.context.cost_at(x)? else {
            return Ok(self.ceiling);
        };

        let mut best = self.best.borrow_mut();
        if cost.is_finite() && best.as_ref().is_none_or(|(_, lowest)| cost < *lowest) {
            *best = Some((theta.to_vec(), cost));
        }
        Ok(cost)
    }

    fn stash(&self, err: Error) -> argmin::core::Error {
        let message = err.to_string();
        let mut slot = self.failure.borrow_mut();
        if slot.is_none() {
            *slot = Some(err);
        }
        argmin::core::Error::msg(message)
    }
}

impl<M, P, const N: usize> CostFunction for Augmented<'_, M, P, N>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        self.value(theta).map_err(|e| self.stash(e))
    }
}

impl<M, P, const N: usize> Gradient for Augmented<'_, M, P, N>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, argmin::core::Error> {
        let failure: RefCell<Option<Error>> = RefCell::new(None);
        let cost = |t: &Vec<f64>| -> f64 {
            self.value(t).unwrap_or_else(|e| {
                failure.borrow_mut().get_or_insert(e);
                f64::NAN
            })
        };

        let gradient = theta.central_diff(&cost);
        match failure.into_inner() {
            Some(e) => Err(self.stash(e)),
            None => Ok(gradient),
        }
    }
}

/// Where an inner minimization ended.
pub(super) struct Minimum {
    pub theta: Vec<f64>,
    pub iters: usize,

    /// Whether `theta` passed the design-space stationarity check.
    pub converged: bool,
}

/// One L-BFGS run from `theta`.
struct Run {
    theta: Vec<f64>,
    iters: usize,
}

/// Minimizes the augmented objective from `theta` with L-BFGS and a
/// Moré–Thuente line search.
///
/// argmin's own verdict is not trusted: every run ends with a check of the
/// projected gradient in design space. Elements a saturated map holds
/// against a bound are released and L-BFGS restarts, up to a small limit.
///
/// # Errors
///
/// Returns [`Error::Unconverged`] if the model does not converge at the
/// starting design, and any evaluation error unchanged.
pub(super) fn minimize<M, P, const N: usize>(
    model: &M,
    problem: &P,
    reparam: &Reparam<N>,
    lagrangian: &Lagrangian,
    theta: Vec<f64>,
    config: &Config,
    evaluations: &Cell<usize>,
) -> Result<Minimum, Error>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    let context = Context {
        model,
        problem,
        reparam,
        lagrangian,
        config,
        evaluations,
    };

    let Some(first) = run(&context, theta.clone())? else {
        return Err(Error::Unconverged {
            x: reparam.to_x(&theta).to_vec(),
        });
    };
    let mut theta = first.theta;
    let mut iters = first.iters;

    for restart in 1..=RESTARTS {
        let check = context.stationarity(&theta)?;
        if check.is_stationary() {
            return Ok(Minimum {
                theta,
                iters,
                converged: true,
            });
        }

        log::debug!(
            "inner run {restart} ended {:.3e} from stationary (tolerance {:.3e}), released {:?}",
            check.measure,
            check.tol,
            check.stuck
        );
        let mut start = theta.clone();
        for &i in &check.stuck {
            reparam.release(&mut start, i);
        }
        match run(&context, start)? {
            Some(next) => {
                theta = next.theta;
                iters += next.iters;
            }
            None => break,
        }
    }

    let converged = context.stationarity(&theta)?.is_stationary();
    Ok(Minimum {
        theta,
        iters,
        converged,
    })
}

/// Runs L-BFGS once. Returns `None` if the model does not converge at the
/// starting design.
///
/// A failure inside argmin that did not come from an evaluation is logged,
/// and the lowest converged point seen is returned.
fn run<M, P, const N: usize>(context: &Context<'_, M, P, N>, theta: Vec<f64>) -> Result<Option<Run>, Error>
where
    M: Model,
    P: OptimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    let Some(start_cost) = context.cost_at(context.reparam.to_x(&theta))? else {
        return Ok(None);
    };

    let failure = RefCell::new(None);
    let best = RefCell::new(Some((theta.clone(), start_cost)));
    let augmented = Augmented {
        context,
        ceiling: start_cost + start_cost.abs().max(1.0),
        failure: &failure,
        best: &best,
    };

    let config = context.config;
    let linesearch = MoreThuenteLineSearch::new();
    let solver = LBFGS::new(linesearch, config.history())
        .with_tolerance_grad(config.grad_tol())
        .map_err(|e| Error::Setup(e.to_string()))?;

    let result = Executor::new(augmented, solver)
        .configure(|state| {
            state
                .param(theta)
                .max_iters(config.max_iters() as u64)
                .target_cost(f64::NEG_INFINITY)
        })
        .run();

    if let Some(err) = failure.borrow_mut().take() {
        return Err(err);
    }

    let iters = match result {
        Ok(result) => usize::try_from(result.state().get_iter()).unwrap_or(usize::MAX),
        Err(err) => {
            log::warn!("inner minimization stopped: {err}");
            0
        }
    };

    Ok(best.into_inner().map(|(theta, _)| Run { theta, iters }))
}
