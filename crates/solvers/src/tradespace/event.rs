use super::Point;

/// Emitted after each grid point is evaluated.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a, const N: usize> {
    /// Index into the row axis values.
    pub row: usize,

    /// Index into the column axis values.
    pub column: usize,

    pub point: &'a Point<N>,
}
