/// Watches a solver's events and optionally steers it.
///
/// Every solver in the workspace reports progress as events: a completed
/// sweep, a Newton step, an outer optimizer iteration. Returning `Some(action)`
/// asks the solver to do something solver-specific, such as stop early;
/// returning `None` lets it carry on.
///
/// Any `FnMut(&E) -> Option<A>` closure is an observer, and `()` is an
/// observer that never acts.
pub trait Observer<E, A> {
    /// Receives one event and returns an optional action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
