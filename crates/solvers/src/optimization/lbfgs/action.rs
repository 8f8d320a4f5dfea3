/// Actions an observer can take during an optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the current outer iteration and return its design.
    StopEarly,
}
