//! The Sellar problem in multidisciplinary-feasible (MDF) form.
//!
//! Two disciplines are coupled through `y1` and `y2`:
//!
//! ```text
//! y1 = z1² + z2 + x - 0.2 y2
//! y2 = √y1 + z1 + z2
//! ```
//!
//! The optimizer sees `x` and `z` only; every evaluation converges the
//! coupling first. The problem is
//!
//! ```text
//! minimize    x² + z2 + y1 + exp(-y2)
//! subject to  3.16 - y1 <= 0
//!             y2 - 24   <= 0
//!             0 <= x, z1, z2 <= 10
//! ```
//!
//! with its optimum at `x = 0`, `z = (1.9776, 0)`, where `f ≈ 3.1834`.
//!
//! The second discipline reflects a negative `y1` to its magnitude before
//! taking the square root. Outside the feasible region that correction can
//! still be active at the fixed point; the analysis reports it.

use std::convert::Infallible;

use mdo_core::{
    Constraint, DesignSpace, DesignSpaceError, Discipline, DisciplineError, DomainGuard,
    DomainPolicy, ExplicitDiscipline, OptimizationProblem, coupling_vars,
};
use mdo_solvers::mda::{self, Analysis, Coupled};

coupling_vars! {
    /// Values exchanged by the two Sellar disciplines.
    pub struct Vars {
        y1 = 1.0,
        y2 = 1.0,
    }
}

/// `[x, z1, z2]`.
pub type Design = [f64; 3];

/// `y1 = z1² + z2 + x - 0.2 y2`
#[derive(Debug, Clone, Copy, Default)]
pub struct Discipline1;

impl Discipline for Discipline1 {
    fn name(&self) -> &str {
        "d1"
    }

    fn reads(&self) -> &[&'static str] {
        &["y2"]
    }

    fn writes(&self) -> &[&'static str] {
        &["y1"]
    }
}

impl ExplicitDiscipline<Design, Vars> for Discipline1 {
    fn compute(
        &self,
        design: &Design,
        vars: &mut Vars,
        _guard: &mut DomainGuard,
    ) -> Result<(), DisciplineError> {
        let [x, z1, z2] = *design;
        vars.y1 = z1 * z1 + z2 + x - 0.2 * vars.y2;
        Ok(())
    }
}

/// `y2 = √y1 + z1 + z2`
#[derive(Debug, Clone, Copy, Default)]
pub struct Discipline2;

impl Discipline for Discipline2 {
    fn name(&self) -> &str {
        "d2"
    }

    fn reads(&self) -> &[&'static str] {
        &["y1"]
    }

    fn writes(&self) -> &[&'static str] {
        &["y2"]
    }
}

impl ExplicitDiscipline<Design, Vars> for Discipline2 {
    fn compute(
        &self,
        design: &Design,
        vars: &mut Vars,
        guard: &mut DomainGuard,
    ) -> Result<(), DisciplineError> {
        let [_, z1, z2] = *design;
        let y1 = guard.non_negative("y1", vars.y1, DomainPolicy::Reflect)?;
        vars.y2 = y1.sqrt() + z1 + z2;
        Ok(())
    }
}

/// Builds the coupled Sellar analysis.
///
/// # Errors
///
/// Returns an error if the disciplines' ports do not match [`Vars`].
pub fn analysis(config: mda::Config) -> Result<Analysis<Design, Vars>, mda::Error> {
    Analysis::builder()
        .explicit(Discipline1)
        .explicit(Discipline2)
        .config(config)
        .build()
}

/// The Sellar MDF optimization problem.
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
                .scalar("x", 0.0, 10.0)
                .array("z", 2, 0.0, 10.0)
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

    fn objective(&self, input: &Design, output: &Coupled<Vars>) -> Result<f64, Infallible> {
        let [x, _, z2] = *input;
        let Vars { y1, y2 } = output.vars;
        Ok(x * x + z2 + y1 + (-y2).exp())
    }

    fn constraint_values(
        &self,
        _input: &Design,
        output: &Coupled<Vars>,
    ) -> Result<Vec<f64>, Infallible> {
        let Vars { y1, y2 } = output.vars;
        Ok(vec![3.16 - y1, y2 - 24.0])
    }

    fn converged(&self, _input: &Design, output: &Coupled<Vars>) -> bool {
        output.converged
    }
}
