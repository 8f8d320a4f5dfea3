//! Interactive visualizations of the MDO solvers.
//!
//! Each mode solves a small problem and opens an interactive plot window
//! showing what the solver did.
//!
//! # Usage
//!
//! ```text
//! cargo run --example plot --features plot -- newton
//! cargo run --example plot --features plot -- minimize
//! cargo run --example plot --features plot -- tradespace
//! cargo run --example plot --features plot -- tradespace 41
//! ```
//!
//! # Modes
//!
//! - **newton**: Intersect the unit circle with the line y = x.
//!   Shows the residual norm collapsing quadratically on a log scale.
//!
//! - **minimize**: Minimize the paraboloid subject to x + y <= 2.
//!   Shows objective and constraint violation per augmented Lagrangian
//!   iteration.
//!
//! - **tradespace [n]**: Sweep the same constrained paraboloid over an n × n
//!   grid (default 11) and mark the feasible region and best point.

use std::{convert::Infallible, error::Error};

use mdo_core::{Constraint, DesignSpace, EquationProblem, Model, OptimizationProblem};
use mdo_observers::{PlotObserver, ShowConfig, TradespacePlot};
use mdo_solvers::{equation::newton, optimization::lbfgs, tradespace};

fn main() -> Result<(), Box<dyn Error>> {
    let mode = std::env::args().nth(1).unwrap_or_else(|| "newton".into());
    match mode.as_str() {
        "newton" => circle(),
        "minimize" => minimize(),
        "tradespace" => {
            let count = std::env::args()
                .nth(2)
                .as_deref()
                .map(str::parse::<usize>)
                .transpose()
                .unwrap_or_else(|_| {
                    eprintln!("Invalid grid size, expected a whole number, e.g. 21");
                    std::process::exit(1);
                })
                .unwrap_or(11);
            sweep(count)
        }
        other => {
            eprintln!("Unknown mode: {other}");
            eprintln!("Usage: plot [newton|minimize|tradespace [n]]");
            std::process::exit(1);
        }
    }
}

/// A model that passes its input through unchanged.
struct Passthrough;

impl Model for Passthrough {
    type Input = [f64; 2];
    type Output = [f64; 2];
    type Error = Infallible;

    fn call(&self, input: &[f64; 2]) -> Result<[f64; 2], Infallible> {
        Ok(*input)
    }
}

// --- Newton ------------------------------------------------------------------

/// Residuals: x² + y² − 1 and x − y.
struct CircleMeetsLine;

impl EquationProblem<2> for CircleMeetsLine {
    type Input = [f64; 2];
    type Output = [f64; 2];
    type Error = Infallible;

    fn input(&self, x: &[f64; 2]) -> Result<[f64; 2], Infallible> {
        Ok(*x)
    }

    fn residuals(&self, _input: &[f64; 2], output: &[f64; 2]) -> Result<[f64; 2], Infallible> {
        let [x, y] = *output;
        Ok([x * x + y * y - 1.0, x - y])
    }
}

/// Solve from (2, 0.5) and plot the residual norm per iteration.
///
/// The residual is plotted on a log scale, where quadratic convergence shows
/// as a curve that steepens each step.
fn circle() -> Result<(), Box<dyn Error>> {
    let mut obs = PlotObserver::<1>::new(["Residual norm"]);

    let solution = newton::solve(
        &Passthrough,
        &CircleMeetsLine,
        [2.0, 0.5],
        &newton::Config::default(),
        &mut obs,
    )?;
    println!("converged to {:?} in {} iterations", solution.x, solution.iters);

    obs.show(
        ShowConfig::new()
            .title("Newton: x² + y² = 1, x = y  →  (0.7071, 0.7071)")
            .log_y(),
    )?;

    Ok(())
}

// --- Minimize ----------------------------------------------------------------

/// f = (x − 3)² + xy + (y + 4)² − 3 on [−10, 10]², with x + y <= 2.
struct Paraboloid {
    space: DesignSpace<2>,
    constraints: Vec<Constraint>,
}

impl Paraboloid {
    fn new() -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            space: DesignSpace::builder()
                .scalar("x", -10.0, 10.0)
                .scalar("y", -10.0, 10.0)
                .build()?,
            constraints: vec![Constraint::upper("g", 2.0)],
        })
    }
}

impl OptimizationProblem<2> for Paraboloid {
    type Input = [f64; 2];
    type Output = [f64; 2];
    type Error = Infallible;

    fn design_space(&self) -> &DesignSpace<2> {
        &self.space
    }

    fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    fn input(&self, x: &[f64; 2]) -> Result<[f64; 2], Infallible> {
        Ok(*x)
    }

    fn objective(&self, _input: &[f64; 2], output: &[f64; 2]) -> Result<f64, Infallible> {
        let [x, y] = *output;
        Ok((x - 3.0).powi(2) + x * y + (y + 4.0).powi(2) - 3.0)
    }

    fn constraint_values(
        &self,
        _input: &[f64; 2],
        output: &[f64; 2],
    ) -> Result<Vec<f64>, Infallible> {
        Ok(vec![output[0] + output[1]])
    }
}

/// Minimize from the origin and plot each outer iteration.
fn minimize() -> Result<(), Box<dyn Error>> {
    let problem = Paraboloid::new()?;
    let mut obs = PlotObserver::<2>::new(["Objective", "Violation"]);

    let solution = lbfgs::minimize(
        &Passthrough,
        &problem,
        [0.0, 0.0],
        &lbfgs::Config::default(),
        &mut obs,
    )?;
    println!(
        "{:?} after {} outer iterations: x = {:?}, f = {:.4}",
        solution.status, solution.iters, solution.x, solution.objective
    );

    obs.show(
        ShowConfig::new()
            .title("Augmented Lagrangian: paraboloid with x + y <= 2")
            .legend(),
    )?;

    Ok(())
}

// --- Tradespace --------------------------------------------------------------

/// Sweep the constrained paraboloid over an evenly spaced grid.
fn sweep(count: usize) -> Result<(), Box<dyn Error>> {
    let problem = Paraboloid::new()?;
    let grid = tradespace::sweep_unobserved(
        &Passthrough,
        &problem,
        [0.0, 0.0],
        tradespace::Axis::linspace(0, -10.0, 10.0, count)?,
        tradespace::Axis::linspace(1, -10.0, 10.0, count)?,
        &tradespace::Config::default(),
    )?;

    if let Some(best) = grid.best_feasible() {
        println!("best grid point: {:?} with f = {:?}", best.x, best.objective());
    }

    TradespacePlot::new(&grid).labels("x", "y").show(
        ShowConfig::new()
            .title("Tradespace: paraboloid with x + y <= 2")
            .legend(),
    )?;

    Ok(())
}
