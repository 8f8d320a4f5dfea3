//! # Paraboloid Tradespace
//!
//! Evaluates the paraboloid on an `n × n` grid over `[-10, 10]²` with the
//! constraint `x + y <= 2`, prints the objective map, and reports the best
//! feasible point.
//!
//! ## Running the Example
//!
//! ```sh
//! cargo run -p mdo-problems --example paraboloid_tradespace -- 11
//! ```

use std::env;

use mdo_problems::paraboloid::{self, Constrained};
use mdo_solvers::{
    mda,
    tradespace::{self, Axis},
};

fn main() {
    let n = env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(11);

    let analysis = paraboloid::analysis(mda::Config::default()).expect("valid analysis");
    let problem = Constrained::new().expect("valid design space");

    let grid = tradespace::sweep_unobserved(
        &analysis,
        &problem,
        [0.0, 0.0],
        Axis::linspace(0, -10.0, 10.0, n).expect("valid axis"),
        Axis::linspace(1, -10.0, 10.0, n).expect("valid axis"),
        &tradespace::Config::default(),
    )
    .expect("axes address the design");

    // One line per x value; infeasible points are starred.
    for row in 0..grid.rows().len() {
        let line: Vec<String> = (0..grid.columns().len())
            .filter_map(|column| grid.get(row, column))
            .map(|point| match point.objective() {
                Some(f) if point.is_feasible() => format!("{f:>8.1} "),
                Some(f) => format!("{f:>8.1}*"),
                None => format!("{:>9}", "failed"),
            })
            .collect();
        println!("x = {:>6.2} |{}", grid.rows().values()[row], line.concat());
    }

    match grid.best_feasible() {
        Some(best) => println!(
            "\nbest feasible: x = {:.3}, y = {:.3}, f = {:.4}",
            best.x[0],
            best.x[1],
            best.objective().unwrap_or(f64::NAN)
        ),
        None => println!("\nno feasible point"),
    }
}
