//! Solvers for equation problems: finding roots of systems of equations.
//!
//! An [`EquationProblem`] maps solver variables `x: [f64; N]` to model inputs,
//! calls the model, and computes residuals. Solvers in this module drive those
//! residuals toward zero.
//!
//! # Solvers
//!
//! - [`newton`]: Newton's method with a finite-difference Jacobian and
//!   backtracking on the residual norm
//!
//! [`EquationProblem`]: mdo_core::EquationProblem

mod evaluate;

pub use evaluate::{EvalError, EvaluateResult, Evaluation, evaluate};

pub mod newton;
