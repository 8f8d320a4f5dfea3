use approx::assert_relative_eq;

use mdo_core::CouplingVars;
use mdo_observers::History;
use mdo_problems::sellar::{self, Mdf, Vars};
use mdo_solvers::{
    mda::{self, Method},
    optimization::{evaluate, gradient, lbfgs},
};

const Y1: f64 = 25.588_302_369_877_685;
const Y2: f64 = 12.058_488_150_611_574;

#[test]
fn converges_at_the_baseline_design() {
    let analysis = sellar::analysis(mda::Config::default()).expect("valid analysis");
    let solution = analysis
        .solve_unobserved(&[1.0, 5.0, 2.0])
        .expect("should converge");

    assert!(solution.is_converged());
    assert_relative_eq!(solution.vars.y1, Y1, epsilon = 1e-8);
    assert_relative_eq!(solution.vars.y2, Y2, epsilon = 1e-8);
    assert_eq!(solution.corrections, 0);
}

#[test]
fn newton_reaches_the_same_fixed_point() {
    let config = mda::Config::default().with_method(Method::Newton);
    let analysis = sellar::analysis(config).expect("valid analysis");
    let solution = analysis
        .solve_unobserved(&[1.0, 5.0, 2.0])
        .expect("should converge");

    assert!(solution.is_converged());
    assert_relative_eq!(solution.vars.y1, Y1, epsilon = 1e-8);
    assert_relative_eq!(solution.vars.y2, Y2, epsilon = 1e-8);
}

#[test]
fn converges_outside_the_design_bounds() {
    let analysis = sellar::analysis(mda::Config::default()).expect("valid analysis");
    let solution = analysis
        .solve_unobserved(&[2.0, -1.0, -1.0])
        .expect("should converge");

    assert!(solution.is_converged());
    assert_relative_eq!(solution.vars.y1, 2.109_516_506_074_799_6, epsilon = 1e-8);
    assert_relative_eq!(solution.vars.y2, -0.547_582_530_373_997_6, epsilon = 1e-8);
}

#[test]
fn any_admissible_start_reaches_the_fixed_point() {
    let analysis = sellar::analysis(mda::Config::default().with_warm_start(false))
        .expect("valid analysis");

    for start in [[0.0, 0.0], [30.0, 15.0], [10.0, 1.0]] {
        let mut vars = Vars::default();
        vars.set(0, start[0]);
        vars.set(1, start[1]);

        let solution = analysis
            .solve_from(&[1.0, 5.0, 2.0], vars, ())
            .expect("should converge");
        assert_relative_eq!(solution.vars.y1, Y1, epsilon = 1e-8);
        assert_relative_eq!(solution.vars.y2, Y2, epsilon = 1e-8);
    }
}

#[test]
fn reports_objective_and_constraints() {
    let analysis = sellar::analysis(mda::Config::default()).expect("valid analysis");
    let problem = Mdf::new().expect("valid space");

    let eval = evaluate(&analysis, &problem, [1.0, 5.0, 2.0]).expect("in bounds");
    assert!(eval.converged);
    assert_relative_eq!(eval.objective, 28.588_308_165_033_748, epsilon = 1e-8);
    assert_relative_eq!(eval.constraints[0], 3.16 - Y1, epsilon = 1e-8);
    assert_relative_eq!(eval.constraints[1], Y2 - 24.0, epsilon = 1e-8);
    assert_relative_eq!(eval.max_violation(&problem), 0.0);
}

#[test]
fn gradient_matches_the_objective_slope() {
    let analysis = sellar::analysis(mda::Config::default()).expect("valid analysis");
    let problem = Mdf::new().expect("valid space");

    let x = [1.0, 5.0, 2.0];
    let grad = gradient(&analysis, &problem, x).expect("in bounds");

    // Compare against a wide central difference in x.
    let h = 1e-3;
    let up = evaluate(&analysis, &problem, [x[0] + h, x[1], x[2]]).expect("in bounds");
    let down = evaluate(&analysis, &problem, [x[0] - h, x[1], x[2]]).expect("in bounds");
    let slope = (up.objective - down.objective) / (2.0 * h);

    assert_relative_eq!(grad.objective[0], slope, epsilon = 1e-2);
    assert_eq!(grad.constraints.len(), 2);
}

#[test]
fn finds_the_mdf_optimum() {
    let analysis = sellar::analysis(mda::Config::default()).expect("valid analysis");
    let problem = Mdf::new().expect("valid space");
    let mut history: History<3> = History::new();

    let solution = lbfgs::minimize(
        &analysis,
        &problem,
        [1.0, 5.0, 2.0],
        &lbfgs::Config::default(),
        &mut history,
    )
    .expect("should converge");

    assert!(solution.is_converged());
    assert!(solution.max_violation <= 1e-4);
    // x and z2 sit on their lower bounds.
    assert!(solution.x[0] < 5e-3, "x = {}", solution.x[0]);
    assert_relative_eq!(solution.x[1], 1.9776, epsilon = 1e-2);
    assert!(solution.x[2] < 5e-3, "z2 = {}", solution.x[2]);
    assert_relative_eq!(solution.objective, 3.1834, epsilon = 1e-2);

    assert_eq!(history.len(), solution.iters);
    assert_eq!(history.last().map(|r| r.x), Some(solution.x));
}
