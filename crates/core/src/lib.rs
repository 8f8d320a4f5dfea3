//! Core traits and types for coupled multidisciplinary analysis and design
//! optimization.
//!
//! This crate defines the shared abstractions that solvers, observers, and
//! problem definitions build on:
//!
//! - [`Model`]: a callable that maps a typed input to a typed output
//! - [`Snapshot`]: a captured input/output pair from a model call
//! - [`Observer`]: receives solver events and optionally returns control actions
//! - [`EquationProblem`], [`OptimizationProblem`]: problem traits that adapt
//!   solver variables to model inputs and extract residuals, objectives, and
//!   constraints from outputs
//! - [`DesignSpace`] and [`Constraint`]: named, bounded design variables and
//!   the limits placed on outputs
//! - [`CouplingVars`], [`ExplicitDiscipline`], [`ImplicitDiscipline`]: the
//!   pieces a coupled analysis is assembled from
//! - [`CouplingGraph`]: who feeds whom, and the order blocks are solved in

mod constraint;
mod coupling;
mod design;
mod discipline;
mod graph;
mod model;
mod observer;
mod problems;

pub use constraint::{Constraint, ConstraintKind, max_violation};
pub use coupling::CouplingVars;
pub use design::{BoundsViolation, Bounds, DesignSpace, DesignSpaceBuilder, DesignSpaceError, DesignVar};
pub use discipline::{
    Correction, Discipline, DisciplineError, DomainError, DomainGuard, DomainPolicy,
    ExplicitDiscipline, ImplicitDiscipline,
};
pub use graph::{Block, CouplingGraph, GraphError, Link, Ports};
pub use observer::Observer;
pub use problems::{EquationProblem, OptimizationProblem};
pub use {model::Model, model::Snapshot};
