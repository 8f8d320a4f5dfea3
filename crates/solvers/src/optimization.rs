//! Solvers for optimization problems: minimizing an objective subject to
//! bounds and constraints.
//!
//! An [`OptimizationProblem`] maps solver variables `x: [f64; N]` to model
//! inputs, calls the model, and extracts a scalar objective and constraint
//! values. The model is usually a coupled [`Analysis`], so each evaluation
//! resolves the coupling before the objective is read.
//!
//! # Solvers
//!
//! - [`lbfgs`]: L-BFGS over bound-free parameters with an augmented
//!   Lagrangian outer loop for constraints
//!
//! [`gradient`] supplies central-difference derivatives of the objective and
//! constraints at a design point.
//!
//! [`Analysis`]: crate::mda::Analysis
//! [`OptimizationProblem`]: mdo_core::OptimizationProblem

mod evaluate;
mod gradient;

pub use evaluate::{EvalError, EvaluateResult, Evaluation, evaluate};
pub use gradient::{Gradient, gradient};

pub mod lbfgs;
