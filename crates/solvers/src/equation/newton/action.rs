/// Actions an observer can take during a Newton solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the current iteration and return the latest iterate.
    StopEarly,
}
