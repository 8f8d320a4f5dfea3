use approx::assert_relative_eq;

use mdo_core::{
    CouplingVars, Discipline, DisciplineError, DomainGuard, DomainPolicy, ExplicitDiscipline,
    GraphError, ImplicitDiscipline, Model, coupling_vars,
};

use super::{Action, Analysis, Config, Error, Event, Method, Status};

coupling_vars! {
    struct Sellar {
        y1 = 1.0,
        y2 = 1.0,
    }
}

/// `[x, z1, z2]`.
type Design = [f64; 3];

const BASELINE: Design = [1.0, 5.0, 2.0];
const Y1: f64 = 25.588_302_369_877_685;
const Y2: f64 = 12.058_488_150_611_574;

/// y1 = z1² + z2 + x − 0.2·y2
struct First;

impl Discipline for First {
    fn name(&self) -> &str {
        "first"
    }
    fn reads(&self) -> &[&'static str] {
        &["y2"]
    }
    fn writes(&self) -> &[&'static str] {
        &["y1"]
    }
}

impl ExplicitDiscipline<Design, Sellar> for First {
    fn compute(
        &self,
        design: &Design,
        vars: &mut Sellar,
        _guard: &mut DomainGuard,
    ) -> Result<(), DisciplineError> {
        let [x, z1, z2] = *design;
        vars.y1 = z1 * z1 + z2 + x - 0.2 * vars.y2;
        Ok(())
    }
}

/// y2 = √y1 + z1 + z2, reflecting negative `y1`.
struct Second;

impl Discipline for Second {
    fn name(&self) -> &str {
        "second"
    }
    fn reads(&self) -> &[&'static str] {
        &["y1"]
    }
    fn writes(&self) -> &[&'static str] {
        &["y2"]
    }
}

impl ExplicitDiscipline<Design, Sellar> for Second {
    fn compute(
        &self,
        design: &Design,
        vars: &mut Sellar,
        guard: &mut DomainGuard,
    ) -> Result<(), DisciplineError> {
        let [_, z1, z2] = *design;
        let y1 = guard.non_negative("y1", vars.y1, DomainPolicy::Reflect)?;
        vars.y2 = y1.sqrt() + z1 + z2;
        Ok(())
    }
}

/// The second discipline in residual form: y2 − √y1 − z1 − z2 = 0.
struct SecondImplicit;

impl Discipline for SecondImplicit {
    fn name(&self) -> &str {
        "second"
    }
    fn reads(&self) -> &[&'static str] {
        &["y1"]
    }
    fn writes(&self) -> &[&'static str] {
        &["y2"]
    }
}

impl ImplicitDiscipline<Design, Sellar> for SecondImplicit {
    fn residuals(
        &self,
        design: &Design,
        vars: &Sellar,
        guard: &mut DomainGuard,
    ) -> Result<Vec<f64>, DisciplineError> {
        let [_, z1, z2] = *design;
        let y1 = guard.non_negative("y1", vars.y1, DomainPolicy::Reflect)?;
        Ok(vec![vars.y2 - y1.sqrt() - z1 - z2])
    }
}

/// Computes y1 but also overwrites y2.
struct Meddler;

impl Discipline for Meddler {
    fn name(&self) -> &str {
        "meddler"
    }
    fn reads(&self) -> &[&'static str] {
        &["y2"]
    }
    fn writes(&self) -> &[&'static str] {
        &["y1"]
    }
}

impl ExplicitDiscipline<Design, Sellar> for Meddler {
    fn compute(
        &self,
        _design: &Design,
        vars: &mut Sellar,
        _guard: &mut DomainGuard,
    ) -> Result<(), DisciplineError> {
        vars.y1 = 1.0;
        vars.y2 = 0.0;
        Ok(())
    }
}

fn sellar() -> Analysis<Design, Sellar> {
    Analysis::builder()
        .explicit(First)
        .explicit(Second)
        .build()
        .expect("valid coupling")
}

fn sellar_with(config: Config) -> Analysis<Design, Sellar> {
    Analysis::builder()
        .explicit(First)
        .explicit(Second)
        .config(config)
        .build()
        .expect("valid coupling")
}

#[test]
fn schedules_the_pair_as_one_cyclic_block() {
    let analysis = sellar();
    assert_eq!(analysis.schedule().len(), 1);
    assert!(analysis.schedule()[0].cyclic);
    assert_eq!(analysis.schedule()[0].members, vec![0, 1]);
    assert_eq!(analysis.discipline_names().collect::<Vec<_>>(), ["first", "second"]);
}

#[test]
fn finds_the_baseline_fixed_point() {
    let solution = sellar().solve_unobserved(&BASELINE).expect("should converge");

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.vars.y1, Y1, epsilon = 1e-8);
    assert_relative_eq!(solution.vars.y2, Y2, epsilon = 1e-8);
    assert_eq!(solution.corrections, 0);
    assert!(solution.active_corrections.is_empty());
}

#[test]
fn converges_from_arbitrary_starts() {
    let analysis = sellar();
    for (y1, y2) in [(0.0, 0.0), (-50.0, 3.0), (1e3, 1e3), (7.0, -40.0)] {
        let solution = analysis
            .solve_from(&BASELINE, Sellar { y1, y2 }, ())
            .expect("should converge");

        assert!(solution.is_converged());
        assert_relative_eq!(solution.vars.y1, Y1, epsilon = 1e-8);
        assert_relative_eq!(solution.vars.y2, Y2, epsilon = 1e-8);
    }
}

#[test]
fn reflected_intermediates_are_counted_but_not_active() {
    // y1 starts at 28 − 0.2·1000, so the first sweep reflects it.
    let solution = sellar()
        .solve_from(&BASELINE, Sellar { y1: 1.0, y2: 1000.0 }, ())
        .expect("should converge");

    assert!(solution.is_converged());
    assert!(solution.corrections >= 1);
    assert!(solution.active_corrections.is_empty());
}

#[test]
fn a_fixed_point_that_needs_reflection_is_flagged() {
    // With x = −30 and z = 0, y1 stays negative at the fixed point.
    let solution = sellar().solve_unobserved(&[-30.0, 0.0, 0.0]).expect("should converge");

    assert!(solution.is_converged());
    assert!(solution.vars.y1 < 0.0);
    assert_eq!(solution.active_corrections.len(), 1);
    assert_eq!(solution.active_corrections[0].discipline, "second");
    assert_eq!(solution.active_corrections[0].quantity, "y1");
    assert_relative_eq!(solution.vars.y2, (-solution.vars.y1).sqrt(), epsilon = 1e-8);
}

#[test]
fn sweep_changes_shrink_after_the_second_sweep() {
    let mut deltas = Vec::new();
    sellar()
        .solve(&BASELINE, |event: &Event<'_, Sellar>| {
            deltas.push(event.delta);
            None
        })
        .expect("should converge");

    assert!(deltas.len() > 3);
    for pair in deltas[1..].windows(2) {
        assert!(pair[1] <= pair[0], "change grew: {pair:?}");
    }
}

#[test]
fn observer_can_stop_the_block() {
    let mut sweeps = 0;
    let solution = sellar()
        .solve(&BASELINE, |event: &Event<'_, Sellar>| {
            sweeps = event.sweep;
            Some(Action::StopEarly)
        })
        .expect("stopping is not an error");

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(sweeps, 1);
    assert_eq!(solution.sweeps, 1);
}

#[test]
fn repeated_model_calls_return_identical_outputs() {
    let analysis = sellar();
    let first = analysis.call(&BASELINE).expect("should converge");
    let second = analysis.call(&BASELINE).expect("should converge");

    assert!(first.converged);
    assert_eq!(first, second);
}

#[test]
fn warm_start_resumes_from_the_last_fixed_point() {
    let analysis = sellar();
    let cold = analysis.solve_unobserved(&BASELINE).expect("should converge");
    assert_eq!(analysis.initial_guess(), cold.vars);

    let warm = analysis.solve_unobserved(&BASELINE).expect("should converge");
    assert_eq!(warm.sweeps, 1);

    analysis.reset();
    assert_eq!(analysis.initial_guess(), Sellar::default());
}

#[test]
fn cold_start_ignores_previous_solutions() {
    let analysis = sellar_with(Config::default().with_warm_start(false));
    analysis.solve_unobserved(&BASELINE).expect("should converge");
    assert_eq!(analysis.initial_guess(), Sellar::default());
}

#[test]
fn running_out_of_sweeps_fails_as_a_model() {
    let config = Config::new(2, 1e-10, 1e-10).expect("valid config");
    let analysis = sellar_with(config);

    let solution = analysis.solve_unobserved(&BASELINE).expect("no hard failure");
    assert_eq!(solution.status, Status::MaxSweeps);
    assert_eq!(solution.sweeps, 2);

    let result = analysis.call(&BASELINE);
    assert!(matches!(result, Err(Error::ConvergenceFailure { sweeps: 2, .. })));
}

#[test]
fn unconverged_output_is_allowed_when_not_required() {
    let config = Config::new(2, 1e-10, 1e-10)
        .expect("valid config")
        .with_require_convergence(false);

    let output = sellar_with(config).call(&BASELINE).expect("allowed");
    assert!(!output.converged);
}

#[test]
fn newton_blocks_reach_the_same_fixed_point() {
    let analysis = sellar_with(Config::default().with_method(Method::Newton));
    let solution = analysis.solve_unobserved(&BASELINE).expect("should converge");

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.vars.y1, Y1, epsilon = 1e-8);
    assert_relative_eq!(solution.vars.y2, Y2, epsilon = 1e-8);
}

#[test]
fn observer_can_stop_a_newton_block() {
    let analysis = sellar_with(Config::default().with_method(Method::Newton));
    let mut events = Vec::new();
    let solution = analysis
        .solve(&BASELINE, |event: &Event<'_, Sellar>| {
            events.push((event.block, event.sweep, *event.vars));
            Some(Action::StopEarly)
        })
        .expect("stopping is not an error");

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.sweeps, 1);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, 0);
    assert_eq!(events[0].1, 1);
    assert_eq!(events[0].2, solution.vars);
}

#[test]
fn newton_counts_corrections_once_per_iterate() {
    // The fixed point at x = −30 needs y1 reflected. The start (1, 1) does
    // not, but every Newton iterate after it does.
    let analysis = sellar_with(Config::default().with_method(Method::Newton));
    let solution = analysis.solve_unobserved(&[-30.0, 0.0, 0.0]).expect("should converge");

    assert!(solution.is_converged());
    assert!(solution.vars.y1 < 0.0);
    assert!(solution.sweeps >= 2);
    assert_eq!(solution.corrections, solution.sweeps);
    assert_eq!(solution.active_corrections.len(), 1);
}

#[test]
fn implicit_members_are_solved_inside_the_sweep() {
    let analysis: Analysis<Design, Sellar> = Analysis::builder()
        .explicit(First)
        .implicit(SecondImplicit)
        .build()
        .expect("valid coupling");

    let solution = analysis.solve_unobserved(&BASELINE).expect("should converge");
    assert_relative_eq!(solution.vars.y1, Y1, epsilon = 1e-8);
    assert_relative_eq!(solution.vars.y2, Y2, epsilon = 1e-8);
}

coupling_vars! {
    struct Root {
        y = 1.0,
    }
}

/// y² − 2 = 0, with nothing upstream.
struct SquareRootOfTwo;

impl Discipline for SquareRootOfTwo {
    fn name(&self) -> &str {
        "sqrt2"
    }
    fn reads(&self) -> &[&'static str] {
        &[]
    }
    fn writes(&self) -> &[&'static str] {
        &["y"]
    }
}

impl ImplicitDiscipline<(), Root> for SquareRootOfTwo {
    fn residuals(
        &self,
        _design: &(),
        vars: &Root,
        _guard: &mut DomainGuard,
    ) -> Result<Vec<f64>, DisciplineError> {
        Ok(vec![vars.y * vars.y - 2.0])
    }
}

#[test]
fn a_lone_implicit_discipline_is_solved_once() {
    let analysis: Analysis<(), Root> = Analysis::builder()
        .implicit(SquareRootOfTwo)
        .build()
        .expect("valid coupling");

    assert!(!analysis.schedule()[0].cyclic);

    let solution = analysis.solve_unobserved(&()).expect("should converge");
    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(solution.vars.y, 2.0_f64.sqrt(), epsilon = 1e-9);
}

#[test]
fn writing_an_unowned_slot_is_rejected() {
    let analysis: Analysis<Design, Sellar> = Analysis::builder()
        .explicit(Meddler)
        .explicit(Second)
        .build()
        .expect("ports are consistent");

    let result = analysis.solve_unobserved(&BASELINE);
    assert!(matches!(
        result,
        Err(Error::Ownership { ref discipline, variable: "y2" }) if discipline == "meddler"
    ));
}

#[test]
fn two_owners_are_rejected_at_build() {
    let result: Result<Analysis<Design, Sellar>, _> = Analysis::builder()
        .explicit(First)
        .explicit(Meddler)
        .explicit(Second)
        .build();

    assert!(matches!(
        result,
        Err(Error::Graph(GraphError::MultipleOwners { ref variable, .. })) if variable == "y1"
    ));
}

#[test]
fn an_unowned_slot_is_rejected_at_build() {
    let result: Result<Analysis<Design, Sellar>, _> =
        Analysis::builder().explicit(First).build();

    assert!(matches!(result, Err(Error::Graph(GraphError::NoOwner(ref name))) if name == "y2"));
}

#[test]
fn slots_are_addressed_by_name() {
    assert_eq!(Sellar::slot("y2"), Some(1));
    assert_eq!(Sellar { y1: 3.0, y2: 4.0 }.to_vec(), vec![3.0, 4.0]);
}
