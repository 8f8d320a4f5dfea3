/// Actions an observer can take during a tradespace sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// End the sweep, keeping the points evaluated so far.
    StopEarly,
}
