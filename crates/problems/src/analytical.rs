//! An analytical MDF problem whose disciplines also produce the constraints.
//!
//! ```text
//! y21 = x1 + x2          g1 = y12/2 + 3 x1/4 + 1
//! y12 = x1/2 + x2        g2 = -y21 - x1 + x3
//! ```
//!
//! Minimizing `x1² + x2² + x3²` over `[-4, 4]³` with `g1, g2 <= 0` puts the
//! optimum at `(-0.8, -0.4, -2)` with both constraints active and `f = 4.8`.

use std::convert::Infallible;

use mdo_core::{
    Constraint, DesignSpace, DesignSpaceError, Discipline, DisciplineError, DomainGuard,
    ExplicitDiscipline, OptimizationProblem, coupling_vars,
};
use mdo_solvers::mda::{self, Analysis, Coupled};

coupling_vars! {
    pub struct Vars {
        y12 = 1.0,
        y21 = 1.0,
        g1 = 1.0,
        g2 = 1.0,
    }
}

/// `[x1, x2, x3]`.
pub type Design = [f64; 3];

/// Produces `y21` and `g1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Analysis1;

impl Discipline for Analysis1 {
    fn name(&self) -> &str {
        "analysis1"
    }

    fn reads(&self) -> &[&'static str] {
        &["y12"]
    }

    fn writes(&self) -> &[&'static str] {
        &["y21", "g1"]
    }
}

impl ExplicitDiscipline<Design, Vars> for Analysis1 {
    fn compute(
        &self,
        design: &Design,
        vars: &mut Vars,
        _guard: &mut DomainGuard,
    ) -> Result<(), DisciplineError> {
        let [x1, x2, _] = *design;
        vars.y21 = x1 + x2;
        vars.g1 = vars.y12 / 2.0 + 0.75 * x1 + 1.0;
        Ok(())
    }
}

/// Produces `y12` and `g2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Analysis2;

impl Discipline for Analysis2 {
    fn name(&self) -> &str {
        "analysis2"
    }

    fn reads(&self) -> &[&'static str] {
        &["y21"]
    }

    fn writes(&self) -> &[&'static str] {
        &["y12", "g2"]
    }
}

impl ExplicitDiscipline<Design, Vars> for Analysis2 {
    fn compute(
        &self,
        design: &Design,
        vars: &mut Vars,
        _guard: &mut DomainGuard,
    ) -> Result<(), DisciplineError> {
        let [x1, x2, x3] = *design;
        vars.y12 = x1 / 2.0 + x2;
        vars.g2 = -vars.y21 - x1 + x3;
        Ok(())
    }
}

/// Builds the coupled analysis.
///
/// # Errors
///
/// Returns an error if the disciplines' ports do not match [`Vars`].
pub fn analysis(config: mda::Config) -> Result<Analysis<Design, Vars>, mda::Error> {
    Analysis::builder()
        .explicit(Analysis1)
        .explicit(Analysis2)
        .config(config)
        .build()
}

/// The analytical MDF optimization problem.
#[derive(Debug, Clone)]
pub struct Mdf {
    space: DesignSpace<3>,
    constraints: Vec<Constraint>,
}

impl Mdf {
    /// # Errors
    ///
    /// Never fails in practice; the bounds are constant.
    pub fn new() -> Result<Self, DesignSpaceError> {
        Ok(Self {
            space: DesignSpace::builder()
                .scalar("x1", -4.0, 4.0)
                .scalar("x2", -4.0, 4.0)
                .scalar("x3", -4.0, 4.0)
                .build()?,
            constraints: vec![Constraint::upper("con1", 0.0), Constraint::upper("con2", 0.0)],
        })
    }
}

impl OptimizationProblem<3> for Mdf {
    type Input = Design;
    type Output = Coupled<Vars>;
    type Error = Infallible;

    fn design_space(&self) -> &DesignSpace<3> {
        &self.space
    }

    fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    fn input(&self, x: &[f64; 3]) -> Result<Design, Infallible> {
        Ok(*x)
    }

    fn objective(&self, input: &Design, _output: &Coupled<Vars>) -> Result<f64, Infallible> {
        Ok(input.iter().map(|x| x * x).sum())
    }

    fn constraint_values(
        &self,
        _input: &Design,
        output: &Coupled<Vars>,
    ) -> Result<Vec<f64>, Infallible> {
        Ok(vec![output.vars.g1, output.vars.g2])
    }

    fn converged(&self, _input: &Design, output: &Coupled<Vars>) -> bool {
        output.converged
    }
}
