use approx::assert_relative_eq;

use mdo_problems::sellar_implicit::{self, Problem};
use mdo_solvers::{
    mda::{self, Method},
    optimization::{evaluate, lbfgs},
};

const Y1: f64 = 0.496_615_465_655_338_9;
const Y2: f64 = 0.704_709_490_254_912_7;

#[test]
fn gauss_seidel_solves_the_implicit_block() {
    let analysis = sellar_implicit::analysis(mda::Config::default()).expect("valid analysis");
    let solution = analysis.solve_unobserved(&[1.0]).expect("should converge");

    assert!(solution.is_converged());
    assert_relative_eq!(solution.vars.y1, Y1, epsilon = 1e-8);
    assert_relative_eq!(solution.vars.y2, Y2, epsilon = 1e-8);

    // Both equations hold at the fixed point.
    let residual = (-solution.vars.y1 * solution.vars.y2).exp() - solution.vars.y2;
    assert_relative_eq!(residual, 0.0, epsilon = 1e-8);
}

#[test]
fn newton_agrees_with_gauss_seidel() {
    let config = mda::Config::default().with_method(Method::Newton);
    let analysis = sellar_implicit::analysis(config).expect("valid analysis");
    let solution = analysis.solve_unobserved(&[1.0]).expect("should converge");

    assert!(solution.is_converged());
    assert_relative_eq!(solution.vars.y1, Y1, epsilon = 1e-8);
    assert_relative_eq!(solution.vars.y2, Y2, epsilon = 1e-8);
}

#[test]
fn evaluates_the_objective() {
    let analysis = sellar_implicit::analysis(mda::Config::default()).expect("valid analysis");
    let problem = Problem::new().expect("valid space");

    let eval = evaluate(&analysis, &problem, [1.0]).expect("in bounds");
    assert!(eval.converged);
    assert_relative_eq!(eval.objective, 2.541_917_430_473_156_4, epsilon = 1e-8);
}

#[test]
fn finds_the_minimum() {
    let analysis = sellar_implicit::analysis(mda::Config::default()).expect("valid analysis");
    let problem = Problem::new().expect("valid space");

    let solution = lbfgs::minimize_unobserved(&analysis, &problem, [1.0], &lbfgs::Config::default())
        .expect("should converge");

    assert!(solution.is_converged());
    assert_relative_eq!(solution.x[0], 1.236_269_182_321_205_5, epsilon = 1e-3);
    assert_relative_eq!(solution.objective, 2.527_529_606_289_422_6, epsilon = 1e-6);
}
