use super::Axis;

/// What happened at one grid point.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Evaluated {
        objective: f64,

        /// One value per declared constraint, in declaration order.
        constraints: Vec<f64>,

        max_violation: f64,

        /// Whether `max_violation` is within the sweep's feasibility
        /// tolerance.
        feasible: bool,
    },

    /// The evaluation failed or its inner solve did not converge.
    Failed { reason: String },
}

/// A design on the grid and what evaluating it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Point<const N: usize> {
    pub x: [f64; N],
    pub outcome: Outcome,
}

impl<const N: usize> Point<N> {
    /// The objective, if the point evaluated.
    #[must_use]
    pub fn objective(&self) -> Option<f64> {
        match self.outcome {
            Outcome::Evaluated { objective, .. } => Some(objective),
            Outcome::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn is_feasible(&self) -> bool {
        matches!(self.outcome, Outcome::Evaluated { feasible: true, .. })
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}

/// The evaluated points of a sweep, stored row-major.
///
/// A sweep stopped by its observer leaves the grid partially filled.
#[derive(Debug, Clone)]
pub struct Grid<const N: usize> {
    rows: Axis,
    columns: Axis,
    points: Vec<Point<N>>,
}

impl<const N: usize> Grid<N> {
    pub(super) fn new(rows: Axis, columns: Axis) -> Self {
        let capacity = rows.len() * columns.len();
        Self {
            rows,
            columns,
            points: Vec::with_capacity(capacity),
        }
    }

    pub(super) fn push(&mut self, point: Point<N>) -> &Point<N> {
        self.points.push(point);
        &self.points[self.points.len() - 1]
    }

    #[must_use]
    pub fn rows(&self) -> &Axis {
        &self.rows
    }

    #[must_use]
    pub fn columns(&self) -> &Axis {
        &self.columns
    }

    /// Evaluated points in row-major order.
    #[must_use]
    pub fn points(&self) -> &[Point<N>] {
        &self.points
    }

    /// The point at `row`, `column`, if it was evaluated.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<&Point<N>> {
        if row >= self.rows.len() || column >= self.columns.len() {
            return None;
        }
        self.points.get(row * self.columns.len() + column)
    }

    /// Returns `true` if every grid point was evaluated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.points.len() == self.rows.len() * self.columns.len()
    }

    /// Number of points whose evaluation failed.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.points.iter().filter(|p| p.is_failed()).count()
    }

    /// The feasible point with the lowest objective.
    #[must_use]
    pub fn best_feasible(&self) -> Option<&Point<N>> {
        self.points
            .iter()
            .filter(|p| p.is_feasible())
            .filter_map(|p| p.objective().map(|f| (p, f)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(p, _)| p)
    }
}
