//! # Analytical MDF Optimization
//!
//! A three-variable problem with two coupled analyses and two active
//! inequality constraints. The optimum is `(-0.8, -0.4, -2)` with `f = 4.8`.
//!
//! ## Running the Example
//!
//! ```sh
//! cargo run -p mdo-problems --example analytical_mdf
//! ```

use mdo_problems::analytical::{self, Mdf};
use mdo_solvers::{
    mda,
    optimization::lbfgs::{self, Event},
};

fn main() {
    let analysis = analytical::analysis(mda::Config::default()).expect("valid analysis");
    let problem = Mdf::new().expect("valid design space");

    let solution = lbfgs::minimize(
        &analysis,
        &problem,
        [1.0, 1.0, 1.0],
        &lbfgs::Config::default(),
        |event: &Event<3>| {
            println!(
                "outer {:>2}: f = {:.6}, violation = {:.3e}, penalty = {:.1e}",
                event.outer, event.objective, event.max_violation, event.penalty
            );
            None
        },
    )
    .expect("optimization should not fail");

    println!("\n{:?}: x = {:.4?}, f = {:.6}", solution.status, solution.x, solution.objective);
    println!("g = {:.3?}", solution.constraints);
}
