//! # Sellar Coupled Analysis
//!
//! Resolves the Sellar coupling at the baseline design `x = 1, z = (5, 2)`
//! with both block methods and prints the convergence of each sweep.
//!
//! ## Running the Example
//!
//! ```sh
//! cargo run -p mdo-problems --example sellar_mda
//! ```

use mdo_problems::sellar::{self, Vars};
use mdo_solvers::mda::{self, Event, Method};

fn main() {
    let design = [1.0, 5.0, 2.0];

    for method in [Method::GaussSeidel, Method::Newton] {
        let config = mda::Config::default().with_method(method);
        let analysis = sellar::analysis(config).expect("ports match the coupling variables");

        println!("{method:?}");
        let solution = analysis
            .solve(&design, |event: &Event<'_, Vars>| {
                println!(
                    "  sweep {:>3}: y1 = {:.12}, y2 = {:.12}, delta = {:.3e}",
                    event.sweep, event.vars.y1, event.vars.y2, event.delta
                );
                None
            })
            .expect("the Sellar disciplines do not fail at this design");

        println!(
            "  {:?} after {} sweeps: y1 = {:.12}, y2 = {:.12}\n",
            solution.status, solution.sweeps, solution.vars.y1, solution.vars.y2
        );
    }
}
