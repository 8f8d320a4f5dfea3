//! The paraboloid `f = (x - 3)² + xy + (y + 4)² - 3`.
//!
//! A single explicit discipline writes `f_xy`; nothing is coupled, so the
//! analysis runs it once per design. The unconstrained minimum is at
//! `(20/3, -22/3)` with `f = -82/3`.

use std::convert::Infallible;

use mdo_core::{
    Constraint, DesignSpace, DesignSpaceError, Discipline, DisciplineError, DomainGuard,
    ExplicitDiscipline, OptimizationProblem, coupling_vars,
};
use mdo_solvers::mda::{self, Analysis, Coupled};

coupling_vars! {
    /// The paraboloid's only output.
    pub struct Vars {
        f_xy = 0.0,
    }
}

/// `[x, y]`.
pub type Design = [f64; 2];

/// Computes `f_xy` from `x` and `y`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Paraboloid;

impl Discipline for Paraboloid {
    fn name(&self) -> &str {
        "paraboloid"
    }

    fn reads(&self) -> &[&'static str] {
        &[]
    }

    fn writes(&self) -> &[&'static str] {
        &["f_xy"]
    }
}

impl ExplicitDiscipline<Design, Vars> for Paraboloid {
    fn compute(
        &self,
        design: &Design,
        vars: &mut Vars,
        _guard: &mut DomainGuard,
    ) -> Result<(), DisciplineError> {
        vars.f_xy = value(design);
        Ok(())
    }
}

/// The paraboloid at `[x, y]`.
#[must_use]
pub fn value(design: &Design) -> f64 {
    let [x, y] = *design;
    (x - 3.0).powi(2) + x * y + (y + 4.0).powi(2) - 3.0
}

/// Builds the single-discipline analysis.
///
/// # Errors
///
/// Returns an error if the discipline's ports do not match [`Vars`].
pub fn analysis(config: mda::Config) -> Result<Analysis<Design, Vars>, mda::Error> {
    Analysis::builder().explicit(Paraboloid).config(config).build()
}

/// Minimize `f_xy` over `[-50, 50]²`.
#[derive(Debug, Clone)]
pub struct Unconstrained {
    space: DesignSpace<2>,
}

impl Unconstrained {
    /// # Errors
    ///
    /// Never fails in practice; the bounds are constant.
    pub fn new() -> Result<Self, DesignSpaceError> {
        Ok(Self {
            space: DesignSpace::builder()
                .scalar("x", -50.0, 50.0)
                .scalar("y", -50.0, 50.0)
                .build()?,
        })
    }
}

impl OptimizationProblem<2> for Unconstrained {
    type Input = Design;
    type Output = Coupled<Vars>;
    type Error = Infallible;

    fn design_space(&self) -> &DesignSpace<2> {
        &self.space
    }

    fn input(&self, x: &[f64; 2]) -> Result<Design, Infallible> {
        Ok(*x)
    }

    fn objective(&self, _input: &Design, output: &Coupled<Vars>) -> Result<f64, Infallible> {
        Ok(output.vars.f_xy)
    }

    fn converged(&self, _input: &Design, output: &Coupled<Vars>) -> bool {
        output.converged
    }
}

/// Minimize `f_xy` over `[-10, 10]²` subject to `g = x + y <= 2`.
///
/// This is the tradespace variant.
#[derive(Debug, Clone)]
pub struct Constrained {
    space: DesignSpace<2>,
    constraints: Vec<Constraint>,
}

impl Constrained {
    /// # Errors
    ///
    /// Never fails in practice; the bounds are constant.
    pub fn new() -> Result<Self, DesignSpaceError> {
        Ok(Self {
            space: DesignSpace::builder()
                .scalar("x", -10.0, 10.0)
                .scalar("y", -10.0, 10.0)
                .build()?,
            constraints: vec![Constraint::upper("g", 2.0)],
        })
    }
}

impl OptimizationProblem<2> for Constrained {
    type Input = Design;
    type Output = Coupled<Vars>;
    type Error = Infallible;

    fn design_space(&self) -> &DesignSpace<2> {
        &self.space
    }

    fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    fn input(&self, x: &[f64; 2]) -> Result<Design, Infallible> {
        Ok(*x)
    }

    fn objective(&self, _input: &Design, output: &Coupled<Vars>) -> Result<f64, Infallible> {
        Ok(output.vars.f_xy)
    }

    fn constraint_values(
        &self,
        input: &Design,
        _output: &Coupled<Vars>,
    ) -> Result<Vec<f64>, Infallible> {
        Ok(vec![input[0] + input[1]])
    }

    fn converged(&self, _input: &Design, output: &Coupled<Vars>) -> bool {
        output.converged
    }
}
