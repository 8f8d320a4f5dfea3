//! Tutorial problems for coupled analysis and design optimization.
//!
//! Each module pairs a coupled [`Analysis`] with the optimization problems
//! posed over it:
//!
//! - [`paraboloid`]: a single discipline with no coupling
//! - [`sellar`]: the two-discipline Sellar problem, solved MDF style
//! - [`sellar_implicit`]: a Sellar variant with one discipline in residual
//!   form
//! - [`analytical`]: two coupled disciplines that also produce the
//!   constraints
//! - [`airflow`]: a flat-plate airflow sensor whose deflection balances
//!   its drag
//!
//! Every problem reads its objective and constraints from the converged
//! coupling variables and reports the analysis status through
//! [`OptimizationProblem::converged`], so drivers never trust an unsettled
//! state.
//!
//! [`Analysis`]: mdo_solvers::mda::Analysis
//! [`OptimizationProblem::converged`]: mdo_core::OptimizationProblem::converged

pub mod airflow;
pub mod analytical;
pub mod paraboloid;
pub mod sellar;
pub mod sellar_implicit;
