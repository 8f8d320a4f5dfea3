//! Multidisciplinary analysis: resolving coupled disciplines to a fixed point.
//!
//! An [`Analysis`] is assembled from explicit and implicit disciplines that
//! share a set of coupling variables `C`. Their declared ports form a
//! coupling graph whose strongly connected components become the blocks of
//! an execution schedule. Blocks run in dependency order:
//!
//! - A block with one explicit member and no self-coupling runs once.
//! - A block with one implicit member and no self-coupling is solved locally
//!   with Newton's method over the slots it owns.
//! - A cyclic block is iterated until every owned slot changes by no more
//!   than `abs_tol + rel_tol * |value|` in a sweep.
//!
//! # Methods
//!
//! [`Method::GaussSeidel`] (the default) sweeps the members of a cyclic block
//! in order, each seeing the values its predecessors just wrote.
//! [`Method::Newton`] solves `y - f(y) = 0` for the whole block at once.
//!
//! # Domain Corrections
//!
//! Disciplines route out-of-domain intermediates through a
//! [`DomainGuard`](mdo_core::DomainGuard). The solution counts every
//! correction and lists those still applied at the reported state, and a
//! warning is logged for each of the latter.
//!
//! # Observer Events
//!
//! Cyclic blocks emit one [`Event`] per sweep (or Newton iteration).
//! Observers can return [`Action::StopEarly`] to stop the current block; the
//! remaining blocks are skipped.

mod action;
mod analysis;
mod block;
mod config;
mod error;
mod event;
mod solution;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use analysis::{Analysis, AnalysisBuilder};
pub use config::{Config, ConfigError, Method};
pub use error::Error;
pub use event::Event;
pub use solution::{Coupled, Solution, Status};
