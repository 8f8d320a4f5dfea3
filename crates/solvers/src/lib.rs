//! Solvers for coupled multidisciplinary analysis and design optimization.
//!
//! - [`mda`] resolves the coupling between disciplines to a fixed point.
//! - [`equation`] finds roots of residual equations.
//! - [`optimization`] minimizes an objective under bounds and constraints.
//! - [`tradespace`] evaluates a problem over a grid of two design values.
//!
//! Every solver reports progress to an [`Observer`] and can be stopped early
//! by it.
//!
//! [`Observer`]: mdo_core::Observer

mod differences;

pub mod equation;
pub mod mda;
pub mod optimization;
pub mod tradespace;
