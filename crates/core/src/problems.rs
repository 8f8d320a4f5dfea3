pub mod equation;
pub mod optimization;

pub use equation::EquationProblem;
pub use optimization::OptimizationProblem;
