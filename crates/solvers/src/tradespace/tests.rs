use std::convert::Infallible;

use approx::assert_relative_eq;
use thiserror::Error;

use mdo_core::{Constraint, DesignSpace, Model, OptimizationProblem};

use super::*;

/// Passes `(x, y)` through, failing for negative `x` when `picky`.
struct Plant {
    picky: bool,
}

#[derive(Debug, Error)]
#[error("negative x")]
struct NegativeX;

impl Model for Plant {
    type Input = [f64; 2];
    type Output = [f64; 2];
    type Error = NegativeX;

    fn call(&self, input: &[f64; 2]) -> Result<[f64; 2], NegativeX> {
        if self.picky && input[0] < 0.0 {
            return Err(NegativeX);
        }
        Ok(*input)
    }
}

/// The paraboloid on `[-10, 10]²` with `x + y <= 2`.
struct Paraboloid {
    space: DesignSpace<2>,
    constraints: Vec<Constraint>,
}

impl Paraboloid {
    fn new() -> Self {
        Self {
            space: DesignSpace::builder()
                .scalar("x", -10.0, 10.0)
                .scalar("y", -10.0, 10.0)
                .build()
                .expect("valid space"),
            constraints: vec![Constraint::upper("g", 2.0)],
        }
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

    fn constraint_values(&self, _input: &[f64; 2], output: &[f64; 2]) -> Result<Vec<f64>, Infallible> {
        Ok(vec![output[0] + output[1]])
    }
}

fn axes() -> (Axis, Axis) {
    (
        Axis::linspace(0, -10.0, 10.0, 5).expect("valid axis"),
        Axis::linspace(1, -10.0, 10.0, 5).expect("valid axis"),
    )
}

#[test]
fn fills_the_grid_row_major() {
    let (rows, columns) = axes();
    let grid = sweep_unobserved(
        &Plant { picky: false },
        &Paraboloid::new(),
        [0.0, 0.0],
        rows,
        columns,
        &Config::default(),
    )
    .expect("valid sweep");

    assert!(grid.is_complete());
    assert_eq!(grid.points().len(), 25);
    assert_eq!(grid.failures(), 0);

    let centre = grid.get(2, 2).expect("evaluated");
    assert_eq!(centre.x, [0.0, 0.0]);
    assert_relative_eq!(centre.objective().expect("evaluated"), 22.0);

    // Row 3 is x = 5, column 1 is y = -5.
    let point = grid.get(3, 1).expect("evaluated");
    assert_eq!(point.x, [5.0, -5.0]);
    assert!(grid.get(5, 0).is_none());
}

#[test]
fn marks_feasibility_and_finds_the_best_feasible_point() {
    let (rows, columns) = axes();
    let grid = sweep_unobserved(
        &Plant { picky: false },
        &Paraboloid::new(),
        [0.0, 0.0],
        rows,
        columns,
        &Config::default(),
    )
    .expect("valid sweep");

    assert!(grid.get(2, 2).expect("evaluated").is_feasible());
    assert!(!grid.get(4, 4).expect("evaluated").is_feasible());
    assert!(matches!(
        grid.get(4, 4).map(|p| &p.outcome),
        Some(Outcome::Evaluated { max_violation, .. }) if (*max_violation - 18.0).abs() < 1e-12
    ));

    let best = grid.best_feasible().expect("some point is feasible");
    assert_eq!(best.x, [5.0, -5.0]);
    assert_relative_eq!(best.objective().expect("evaluated"), -23.0);
}

#[test]
fn failed_points_are_recorded_not_fatal() {
    let (rows, columns) = axes();
    let grid = sweep_unobserved(
        &Plant { picky: true },
        &Paraboloid::new(),
        [0.0, 0.0],
        rows,
        columns,
        &Config::default(),
    )
    .expect("failures are recorded");

    assert!(grid.is_complete());
    // Rows -10 and -5 fail.
    assert_eq!(grid.failures(), 10);
    match &grid.get(0, 0).expect("evaluated").outcome {
        Outcome::Failed { reason } => assert_eq!(reason, "model call failed: negative x"),
        Outcome::Evaluated { .. } => panic!("expected a failure"),
    }
}

#[test]
fn observer_sees_each_point_and_can_stop() {
    let (rows, columns) = axes();
    let mut seen = Vec::new();
    let grid = sweep(
        &Plant { picky: false },
        &Paraboloid::new(),
        [0.0, 0.0],
        rows,
        columns,
        &Config::default(),
        |event: &Event<'_, 2>| {
            seen.push((event.row, event.column, event.point.x));
            (seen.len() == 7).then_some(Action::StopEarly)
        },
    )
    .expect("valid sweep");

    assert_eq!(seen.len(), 7);
    assert_eq!(seen[6], (1, 1, [-5.0, -5.0]));
    assert!(!grid.is_complete());
    assert_eq!(grid.points().len(), 7);
    assert!(grid.get(1, 1).is_some());
    assert!(grid.get(1, 2).is_none());
}

#[test]
fn rejects_bad_axes_before_evaluating() {
    let problem = Paraboloid::new();
    let plant = Plant { picky: false };
    let config = Config::default();
    let column = || Axis::new(1, vec![0.0]).expect("valid axis");

    let result = sweep_unobserved(
        &plant,
        &problem,
        [0.0, 0.0],
        Axis::new(2, vec![0.0]).expect("valid axis"),
        column(),
        &config,
    );
    assert!(matches!(result, Err(Error::AxisIndex { index: 2, len: 2 })));

    let result = sweep_unobserved(
        &plant,
        &problem,
        [0.0, 0.0],
        Axis::new(1, vec![0.0]).expect("valid axis"),
        column(),
        &config,
    );
    assert!(matches!(result, Err(Error::SameAxis(1))));

    let result = sweep_unobserved(
        &plant,
        &problem,
        [0.0, 0.0],
        Axis::linspace(0, 0.0, 11.0, 3).expect("valid axis"),
        column(),
        &config,
    );
    assert!(matches!(result, Err(Error::Bounds(ref v)) if v.label == "x"));
}

#[test]
fn axes_validate_their_values() {
    assert_eq!(Axis::new(0, vec![]), Err(AxisError::Empty));
    assert_eq!(Axis::new(0, vec![1.0, f64::NAN]), Err(AxisError::NonFinite));
    assert_eq!(Axis::linspace(0, 1.0, 0.0, 3), Err(AxisError::Range));
    assert_eq!(Axis::linspace(0, 0.0, 1.0, 0), Err(AxisError::Empty));

    let axis = Axis::linspace(0, 0.0, 1.0, 3).expect("valid axis");
    assert_eq!(axis.values(), &[0.0, 0.5, 1.0]);
    assert_eq!(Axis::linspace(0, 2.0, 2.0, 1).expect("valid").values(), &[2.0]);
    assert_eq!(Config::new(-1.0), Err(ConfigError::FeasibilityTol));
}
