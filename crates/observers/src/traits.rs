//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, enabling
//! observers to work generically across different solvers.
//!
//! # Event traits
//!
//! - [`HasResidual`]: events that carry a residual or change measure
//! - [`HasObjective`]: events that carry an objective value
//! - [`HasViolation`]: events that carry a constraint violation
//! - [`HasDesign`]: events that carry a design point
//!
//! # Action traits
//!
//! - [`CanStopEarly`]: actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use mdo_core::Observer;
//! use mdo_observers::traits::{CanStopEarly, HasResidual};
//!
//! struct GoodEnough {
//!     tolerance: f64,
//!     min_iters: usize,
//!     iter: usize,
//! }
//!
//! impl<E: HasResidual, A: CanStopEarly> Observer<E, A> for GoodEnough {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         self.iter += 1;
//!         if self.iter >= self.min_iters && event.residual().abs() < self.tolerance {
//!             return Some(A::stop_early());
//!         }
//!         None
//!     }
//! }
//! ```

use mdo_solvers::{
    equation::newton,
    mda,
    optimization::lbfgs,
    tradespace::{self, Outcome},
};

/// An event that carries a residual value.
pub trait HasResidual {
    /// Returns the residual for this event.
    ///
    /// Returns `f64::NAN` when the event represents an error and no residual
    /// is available.
    fn residual(&self) -> f64;
}

/// An event that carries an objective value.
pub trait HasObjective {
    /// Returns the objective for this event.
    ///
    /// Returns `f64::NAN` when the event represents an error and no objective
    /// is available.
    fn objective(&self) -> f64;
}

/// An event that carries the largest constraint violation at its design.
pub trait HasViolation {
    /// Returns the violation, or `f64::NAN` if none is available.
    fn max_violation(&self) -> f64;
}

/// An event tied to a design point.
pub trait HasDesign<const N: usize> {
    fn design(&self) -> [f64; N];
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

// --- HasResidual ---

impl<const N: usize> HasResidual for newton::Event<N> {
    fn residual(&self) -> f64 {
        self.residual_norm()
    }
}

/// The change between sweeps stands in for a residual.
impl<C> HasResidual for mda::Event<'_, C> {
    fn residual(&self) -> f64 {
        self.delta
    }
}

// --- HasObjective and HasViolation ---

impl<const N: usize> HasObjective for lbfgs::Event<N> {
    fn objective(&self) -> f64 {
        self.objective
    }
}

impl<const N: usize> HasViolation for lbfgs::Event<N> {
    fn max_violation(&self) -> f64 {
        self.max_violation
    }
}

impl<const N: usize> HasObjective for tradespace::Event<'_, N> {
    fn objective(&self) -> f64 {
        self.point.objective().unwrap_or(f64::NAN)
    }
}

impl<const N: usize> HasViolation for tradespace::Event<'_, N> {
    fn max_violation(&self) -> f64 {
        match self.point.outcome {
            Outcome::Evaluated { max_violation, .. } => max_violation,
            Outcome::Failed { .. } => f64::NAN,
        }
    }
}

// --- HasDesign ---

impl<const N: usize> HasDesign<N> for newton::Event<N> {
    fn design(&self) -> [f64; N] {
        self.x
    }
}

impl<const N: usize> HasDesign<N> for lbfgs::Event<N> {
    fn design(&self) -> [f64; N] {
        self.x
    }
}

impl<const N: usize> HasDesign<N> for tradespace::Event<'_, N> {
    fn design(&self) -> [f64; N] {
        self.point.x
    }
}

// --- CanStopEarly impls ---

impl CanStopEarly for newton::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanStopEarly for mda::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanStopEarly for lbfgs::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanStopEarly for tradespace::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
