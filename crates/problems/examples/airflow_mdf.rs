//! # Airflow Sensor Sizing
//!
//! Sizes a flat plate hinged on a torsional spring so that it deflects to a
//! target angle in a 40 m/s flow without exceeding the drag limit. The
//! deflection and drag are coupled, and the structural balance is implicit.
//!
//! ## Running the Example
//!
//! ```sh
//! cargo run -p mdo-problems --example airflow_mdf
//! ```

use mdo_problems::airflow::{self, Mdf};
use mdo_solvers::{
    mda,
    optimization::{evaluate, lbfgs},
};

fn main() {
    // The coupling contracts slowly for long plates; allow more sweeps. Large
    // plates never settle, so report them to the optimizer instead of failing.
    let config = mda::Config::new(500, 1e-10, 1e-10)
        .expect("valid config")
        .with_require_convergence(false);
    let analysis = airflow::analysis(config).expect("valid analysis");
    let problem = Mdf::new().expect("valid design space");

    let start = [0.05, 0.2];
    let eval = evaluate(&analysis, &problem, start).expect("start is within bounds");
    let vars = &eval.snapshot.output.vars;
    println!(
        "start {start:?}: theta = {:.6}, F = {:.6}, f = {:.6e}",
        vars.theta, vars.force, eval.objective
    );

    match lbfgs::minimize_unobserved(&analysis, &problem, start, &lbfgs::Config::default()) {
        Ok(solution) => {
            let vars = &solution.snapshot.output.vars;
            println!(
                "{:?}: l = {:.4}, w = {:.4}, theta = {:.4}, F = {:.4}, f = {:.3e}",
                solution.status,
                solution.x[0],
                solution.x[1],
                vars.theta,
                vars.force,
                solution.objective
            );
        }
        Err(err) => eprintln!("optimization failed: {err}"),
    }
}
