use approx::assert_relative_eq;

use mdo_problems::airflow::{self, DENSITY, DRAG_COEFFICIENT, Mdf, SPEED, STIFFNESS, Vars};
use mdo_solvers::{mda, optimization::evaluate};

fn config() -> mda::Config {
    mda::Config::new(500, 1e-10, 1e-10).expect("valid config")
}

/// Checks both disciplines' equations at `vars`.
fn assert_consistent(design: [f64; 2], vars: &Vars) {
    let [l, w] = design;
    let moment = STIFFNESS * vars.theta - 0.5 * vars.force * l * vars.theta.cos();
    assert_relative_eq!(moment, 0.0, epsilon = 1e-8);

    let drag = 0.5 * DENSITY * DRAG_COEFFICIENT * l * w * vars.theta.cos() * SPEED * SPEED;
    assert_relative_eq!(vars.force, drag, epsilon = 1e-6);
}

#[test]
fn small_plates_barely_deflect() {
    let analysis = airflow::analysis(config()).expect("valid analysis");
    let solution = analysis.solve_unobserved(&[0.01, 0.01]).expect("should converge");

    assert!(solution.is_converged());
    assert_relative_eq!(solution.vars.theta, 0.015_995_906_444_788, epsilon = 1e-8);
    assert_relative_eq!(solution.vars.force, 0.159_979_530_914_617, epsilon = 1e-8);
    assert_consistent([0.01, 0.01], &solution.vars);
}

#[test]
fn converges_near_the_sized_design() {
    let analysis = airflow::analysis(config()).expect("valid analysis");
    let design = [0.0365, 0.274];
    let solution = analysis.solve_unobserved(&design).expect("should converge");

    assert!(solution.is_converged());
    assert_consistent(design, &solution.vars);
}

#[test]
fn reports_the_sizing_constraints() {
    let analysis = airflow::analysis(config()).expect("valid analysis");
    let problem = Mdf::new().expect("valid space");

    let eval = evaluate(&analysis, &problem, [0.01, 0.01]).expect("in bounds");
    assert!(eval.converged);

    let vars = &eval.snapshot.output.vars;
    assert_relative_eq!(eval.objective, (vars.theta - 0.25).powi(2));
    assert_relative_eq!(eval.constraints[0], vars.force - 7.0);
    assert_relative_eq!(eval.constraints[1], 0.01 * 0.01 - 0.01);
    assert!(eval.max_violation(&problem) > 1.0);
}
