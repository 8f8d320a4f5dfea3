/// Emitted after every sweep of a cyclic block.
///
/// For Gauss–Seidel blocks `delta` is the largest absolute change of any
/// coupling variable owned by the block during the sweep. For Newton blocks
/// it is the largest absolute component of the Newton step.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a, C> {
    /// Position of the block in the schedule.
    pub block: usize,

    /// Sweep number within the block, starting at 1.
    pub sweep: usize,

    /// Largest absolute change in this sweep.
    pub delta: f64,

    /// Coupling variables after the sweep.
    pub vars: &'a C,
}
