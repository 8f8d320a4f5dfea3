//! A flat-plate airflow sensor.
//!
//! A plate of length `l` and width `w` hangs on a torsion spring in a
//! 40 m/s stream. Drag deflects it by `θ`, and deflection reduces the frontal
//! area that drag acts on:
//!
//! ```text
//! structures (implicit):  k θ - F l cos(θ) / 2 = 0
//! aerodynamics:           F = ρ Cd l w cos(θ) v² / 2
//! ```
//!
//! The design problem asks for a deflection near 0.25 rad while holding the
//! drag at 7 N and the plate area at 0.01 m². Those two constraints pin
//! `cos θ = 7/16`, so the optimum sits at `θ ≈ 1.118`, `l ≈ 0.0365`, and
//! `w ≈ 0.274`.

use std::convert::Infallible;

use mdo_core::{
    Constraint, DesignSpace, DesignSpaceError, Discipline, DisciplineError, DomainGuard,
    ExplicitDiscipline, ImplicitDiscipline, OptimizationProblem, coupling_vars,
};
use mdo_solvers::mda::{self, Analysis, Coupled};

/// Torsion spring stiffness, N·m/rad.
pub const STIFFNESS: f64 = 0.05;

/// Drag coefficient of the plate.
pub const DRAG_COEFFICIENT: f64 = 2.0;

/// Air density, kg/m³.
pub const DENSITY: f64 = 1.0;

/// Stream speed, m/s.
pub const SPEED: f64 = 40.0;

coupling_vars! {
    pub struct Vars {
        /// Deflection, rad.
        theta = 0.1,
        /// Drag force, N.
        force = 3.0,
    }
}

/// `[l, w]` in metres.
pub type Design = [f64; 2];

/// Spring balance: `k θ - F l cos(θ) / 2 = 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Structures;

impl Discipline for Structures {
    fn name(&self) -> &str {
        "structures"
    }

    fn reads(&self) -> &[&'static str] {
        &["force"]
    }

    fn writes(&self) -> &[&'static str] {
        &["theta"]
    }
}

impl ImplicitDiscipline<Design, Vars> for Structures {
    fn residuals(
        &self,
        design: &Design,
        vars: &Vars,
        _guard: &mut DomainGuard,
    ) -> Result<Vec<f64>, DisciplineError> {
        let [l, _] = *design;
        let Vars { theta, force } = *vars;
        Ok(vec![STIFFNESS * theta - 0.5 * force * l * theta.cos()])
    }
}

/// Drag on the deflected plate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aerodynamics;

impl Discipline for Aerodynamics {
    fn name(&self) -> &str {
        "aerodynamics"
    }

    fn reads(&self) -> &[&'static str] {
        &["theta"]
    }

    fn writes(&self) -> &[&'static str] {
        &["force"]
    }
}

impl ExplicitDiscipline<Design, Vars> for Aerodynamics {
    fn compute(
        &self,
        design: &Design,
        vars: &mut Vars,
        _guard: &mut DomainGuard,
    ) -> Result<(), DisciplineError> {
        let [l, w] = *design;
        let frontal_area = l * w * vars.theta.cos();
        vars.force = 0.5 * DENSITY * DRAG_COEFFICIENT * frontal_area * SPEED * SPEED;
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
        .implicit(Structures)
        .explicit(Aerodynamics)
        .config(config)
        .build()
}

/// The sensor sizing problem.
#[derive(Debug, Clone)]
pub struct Mdf {
    space: DesignSpace<2>,
    constraints: Vec<Constraint>,
}

impl Mdf {
    /// # Errors
    ///
    /// Never fails in practice; the bounds are constant.
    pub fn new() -> Result<Self, DesignSpaceError> {
        Ok(Self {
            space: DesignSpace::builder()
                .scalar("l", 0.01, 1.0)
                .scalar("w", 0.01, 1.0)
                .build()?,
            constraints: vec![
                Constraint::range("con1", -1e-5, 0.0),
                Constraint::equals("con2", 0.0),
            ],
        })
    }
}

impl OptimizationProblem<2> for Mdf {
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
        Ok((output.vars.theta - 0.25).powi(2))
    }

    fn constraint_values(
        &self,
        input: &Design,
        output: &Coupled<Vars>,
    ) -> Result<Vec<f64>, Infallible> {
        let [l, w] = *input;
        Ok(vec![output.vars.force - 7.0, l * w - 0.01])
    }

    fn converged(&self, _input: &Design, output: &Coupled<Vars>) -> bool {
        output.converged
    }
}
