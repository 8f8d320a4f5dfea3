//! # Sellar MDF Optimization
//!
//! Minimizes the Sellar objective over `x` and `z` with every evaluation
//! resolving the coupling first, and prints the outer iteration history.
//!
//! ## Running the Example
//!
//! ```sh
//! cargo run -p mdo-problems --example sellar_mdf
//! ```

use mdo_observers::History;
use mdo_problems::sellar::{self, Mdf};
use mdo_solvers::{mda, optimization::lbfgs};

fn main() {
    let analysis = sellar::analysis(mda::Config::default()).expect("valid analysis");
    let problem = Mdf::new().expect("valid design space");
    let mut history: History<3> = History::new();

    let solution = lbfgs::minimize(
        &analysis,
        &problem,
        [1.0, 5.0, 2.0],
        &lbfgs::Config::default(),
        &mut history,
    )
    .expect("optimization should not fail");

    for (i, record) in history.records().iter().enumerate() {
        println!(
            "outer {:>2}: x = {:.6?}, f = {:.8}, violation = {:.3e}",
            i + 1,
            record.x,
            record.objective,
            record.max_violation
        );
    }

    let vars = &solution.snapshot.output.vars;
    println!(
        "\n{:?} after {} model evaluations",
        solution.status, solution.evaluations
    );
    println!("x = {:.6}, z = {:.6?}", solution.x[0], &solution.x[1..]);
    println!("y1 = {:.6}, y2 = {:.6}", vars.y1, vars.y2);
    println!("f = {:.8}", solution.objective);
}
