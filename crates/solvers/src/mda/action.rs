/// Actions an observer can take during a coupled analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop iterating the current block and return the latest estimate.
    ///
    /// The solution is reported as [`Status::StoppedByObserver`] and must not
    /// be trusted as a fixed point.
    ///
    /// [`Status::StoppedByObserver`]: super::Status::StoppedByObserver
    StopEarly,
}
