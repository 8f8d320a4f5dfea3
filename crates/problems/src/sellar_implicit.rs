//! A Sellar variant with its second discipline in residual form.
//!
//! ```text
//! y1 = y2²
//! exp(-y1 y2) - x y2 = 0
//! ```
//!
//! Minimizing `f = y1² - y2 + 3` reduces to minimizing `y2⁴ - y2 + 3`, so the
//! optimum has `y2 = 4^(-1/3)` and `f ≈ 2.5275` at `x ≈ 1.2363`.

use std::convert::Infallible;

use mdo_core::{
    DesignSpace, DesignSpaceError, Discipline, DisciplineError, DomainGuard, ExplicitDiscipline,
    ImplicitDiscipline, OptimizationProblem, coupling_vars,
};
use mdo_solvers::mda::{self, Analysis, Coupled};

coupling_vars! {
    pub struct Vars {
        y1 = 1.0,
        y2 = 1.0,
    }
}

/// `[x]`.
pub type Design = [f64; 1];

/// `y1 = y2²`
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
        _design: &Design,
        vars: &mut Vars,
        _guard: &mut DomainGuard,
    ) -> Result<(), DisciplineError> {
        vars.y1 = vars.y2 * vars.y2;
        Ok(())
    }
}

/// `exp(-y1 y2) - x y2 = 0`, solved for `y2`.
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

impl ImplicitDiscipline<Design, Vars> for Discipline2 {
    fn residuals(
        &self,
        design: &Design,
        vars: &Vars,
        _guard: &mut DomainGuard,
    ) -> Result<Vec<f64>, DisciplineError> {
        let [x] = *design;
        let Vars { y1, y2 } = *vars;
        Ok(vec![(-y1 * y2).exp() - x * y2])
    }
}

/// Builds the coupled analysis.
///
/// With [`mda::Method::Newton`] the block is solved jointly; with the default
/// Gauss–Seidel sweep `y2` is found by a local Newton solve each sweep.
///
/// # Errors
///
/// Returns an error if the disciplines' ports do not match [`Vars`].
pub fn analysis(config: mda::Config) -> Result<Analysis<Design, Vars>, mda::Error> {
    Analysis::builder()
        .explicit(Discipline1)
        .implicit(Discipline2)
        .config(config)
        .build()
}

/// Minimize `y1² - y2 + 3` over `x` in `[0.1, 10]`.
#[derive(Debug, Clone)]
pub struct Problem {
    space: DesignSpace<1>,
}

impl Problem {
    /// # Errors
    ///
    /// Never fails in practice; the bounds are constant.
    pub fn new() -> Result<Self, DesignSpaceError> {
        Ok(Self {
            space: DesignSpace::builder().scalar("x", 0.1, 10.0).build()?,
        })
    }
}

impl OptimizationProblem<1> for Problem {
    type Input = Design;
    type Output = Coupled<Vars>;
    type Error = Infallible;

    fn design_space(&self) -> &DesignSpace<1> {
        &self.space
    }

    fn input(&self, x: &[f64; 1]) -> Result<Design, Infallible> {
        Ok(*x)
    }

    fn objective(&self, _input: &Design, output: &Coupled<Vars>) -> Result<f64, Infallible> {
        let Vars { y1, y2 } = output.vars;
        Ok(y1 * y1 - y2 + 3.0)
    }

    fn converged(&self, _input: &Design, output: &Coupled<Vars>) -> bool {
        output.converged
    }
}
