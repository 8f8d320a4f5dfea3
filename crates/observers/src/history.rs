//! In-memory iteration history.

use mdo_core::Observer;

use crate::traits::{HasDesign, HasObjective, HasViolation};

/// One observed design and how it scored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record<const N: usize> {
    pub x: [f64; N],
    pub objective: f64,
    pub max_violation: f64,
}

/// Records the design, objective, and constraint violation of every event it
/// observes, and never returns an action.
///
/// Pass `&mut History` as the observer so the records stay available after
/// the solve:
///
/// ```ignore
/// let mut history: History<2> = History::new();
/// lbfgs::minimize(&model, &problem, x0, &config, &mut history)?;
/// for record in history.records() {
///     println!("{:?} -> {}", record.x, record.objective);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct History<const N: usize> {
    records: Vec<Record<N>>,
}

impl<const N: usize> History<N> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in the order they were observed.
    #[must_use]
    pub fn records(&self) -> &[Record<N>] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Record<N>> {
        self.records.last()
    }

    /// The record with the lowest objective among those whose violation is at
    /// most `tol`.
    #[must_use]
    pub fn best_feasible(&self, tol: f64) -> Option<&Record<N>> {
        self.records
            .iter()
            .filter(|r| r.max_violation <= tol && !r.objective.is_nan())
            .min_by(|a, b| a.objective.total_cmp(&b.objective))
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl<const N: usize, E, A> Observer<E, A> for History<N>
where
    E: HasDesign<N> + HasObjective + HasViolation,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self.records.push(Record {
            x: event.design(),
            objective: event.objective(),
            max_violation: event.max_violation(),
        });
        None
    }
}

/// Allows `&mut History<N>` to be passed to solvers that take an observer by
/// value.
impl<const N: usize, E, A> Observer<E, A> for &mut History<N>
where
    E: HasDesign<N> + HasObjective + HasViolation,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        (*self).observe(event)
    }
}

#[cfg(test)]
mod tests {
    use mdo_solvers::optimization::lbfgs::{Action, Event};

    use super::*;

    fn event(outer: usize, x: [f64; 2], objective: f64, max_violation: f64) -> Event<2> {
        Event {
            outer,
            x,
            objective,
            constraints: vec![],
            max_violation,
            penalty: 10.0,
            inner_iters: 4,
        }
    }

    fn feed(history: &mut History<2>, event: &Event<2>) {
        let action: Option<Action> = history.observe(event);
        assert!(action.is_none());
    }

    #[test]
    fn records_every_event_in_order() {
        let mut history: History<2> = History::new();
        feed(&mut history, &event(1, [0.0, 1.0], 3.0, 0.5));
        feed(&mut history, &event(2, [0.5, 1.0], 2.0, 0.0));

        assert_eq!(history.len(), 2);
        assert_eq!(history.records()[0].x, [0.0, 1.0]);
        assert_eq!(
            history.last(),
            Some(&Record {
                x: [0.5, 1.0],
                objective: 2.0,
                max_violation: 0.0,
            })
        );
    }

    #[test]
    fn best_feasible_skips_violating_records() {
        let mut history: History<2> = History::new();
        feed(&mut history, &event(1, [0.0, 0.0], -10.0, 1.0));
        feed(&mut history, &event(2, [1.0, 0.0], 4.0, 1e-6));
        feed(&mut history, &event(3, [2.0, 0.0], 5.0, 0.0));

        let best = history.best_feasible(1e-4).expect("two are feasible");
        assert_eq!(best.x, [1.0, 0.0]);
        assert!(history.best_feasible(-1.0).is_none());

        history.clear();
        assert!(history.is_empty());
    }

    /// Drives an observer taken by value, the way solvers do.
    fn drive<O: Observer<Event<2>, Action>>(mut observer: O) {
        let _ = observer.observe(&event(1, [3.0, 4.0], 1.0, 0.0));
    }

    #[test]
    fn works_through_a_mutable_reference() {
        let mut history: History<2> = History::new();
        drive(&mut history);
        assert_eq!(history.len(), 1);
    }
}
