/// How a constraint value is limited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintKind {
    /// `value <= upper`
    Upper(f64),

    /// `value >= lower`
    Lower(f64),

    /// `lower <= value <= upper`
    Range { lower: f64, upper: f64 },

    /// `value == target`
    Equals(f64),
}

/// A named scalar output that must satisfy a [`ConstraintKind`].
///
/// Problems declare their constraints once; solvers pair each declaration
/// with the value computed at every evaluation, in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    name: String,
    kind: ConstraintKind,
}

impl Constraint {
    /// `value <= upper`.
    pub fn upper(name: impl Into<String>, upper: f64) -> Self {
        Self::new(name, ConstraintKind::Upper(upper))
    }

    /// `value >= lower`.
    pub fn lower(name: impl Into<String>, lower: f64) -> Self {
        Self::new(name, ConstraintKind::Lower(lower))
    }

    /// `lower <= value <= upper`.
    pub fn range(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self::new(name, ConstraintKind::Range { lower, upper })
    }

    /// `value == target`.
    pub fn equals(name: impl Into<String>, target: f64) -> Self {
        Self::new(name, ConstraintKind::Equals(target))
    }

    fn new(name: impl Into<String>, kind: ConstraintKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    /// Returns `true` for [`ConstraintKind::Equals`].
    #[must_use]
    pub fn is_equality(&self) -> bool {
        matches!(self.kind, ConstraintKind::Equals(_))
    }

    /// Distance by which `value` misses the constraint, zero when satisfied.
    ///
    /// A `NaN` value is infinitely violated.
    #[must_use]
    pub fn violation(&self, value: f64) -> f64 {
        if value.is_nan() {
            return f64::INFINITY;
        }
        match self.kind {
            ConstraintKind::Upper(upper) => (value - upper).max(0.0),
            ConstraintKind::Lower(lower) => (lower - value).max(0.0),
            ConstraintKind::Range { lower, upper } => {
                (lower - value).max(0.0).max((value - upper).max(0.0))
            }
            ConstraintKind::Equals(target) => (value - target).abs(),
        }
    }

    /// Returns `true` if `value` misses the constraint by at most `tol`.
    #[must_use]
    pub fn is_satisfied(&self, value: f64, tol: f64) -> bool {
        self.violation(value) <= tol
    }
}

/// The largest violation across paired constraints and values.
///
/// Returns zero when there are no constraints.
#[must_use]
pub fn max_violation(constraints: &[Constraint], values: &[f64]) -> f64 {
    constraints
        .iter()
        .zip(values)
        .map(|(constraint, &value)| constraint.violation(value))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn one_sided_violations() {
        let upper = Constraint::upper("con2", 0.0);
        assert_eq!(upper.violation(-3.0), 0.0);
        assert_eq!(upper.violation(0.0), 0.0);
        assert_relative_eq!(upper.violation(2.5), 2.5);

        let lower = Constraint::lower("margin", 1.0);
        assert_eq!(lower.violation(4.0), 0.0);
        assert_relative_eq!(lower.violation(0.25), 0.75);
    }

    #[test]
    fn range_and_equality_violations() {
        let range = Constraint::range("force", -1e-5, 0.0);
        assert_eq!(range.violation(-5e-6), 0.0);
        assert_relative_eq!(range.violation(0.5), 0.5);
        assert_relative_eq!(range.violation(-1.0), 1.0 - 1e-5);

        let area = Constraint::equals("area", 0.01);
        assert!(area.is_equality());
        assert_relative_eq!(area.violation(0.0125), 0.0025, epsilon = 1e-15);
        assert_relative_eq!(area.violation(0.0075), 0.0025, epsilon = 1e-15);
        assert!(area.is_satisfied(0.010_000_1, 1e-6));
    }

    #[test]
    fn nan_is_infinitely_violated() {
        assert!(Constraint::upper("g", 0.0).violation(f64::NAN).is_infinite());
    }

    #[test]
    fn max_violation_over_a_set() {
        let constraints = [Constraint::upper("g1", 0.0), Constraint::upper("g2", 0.0)];
        assert_eq!(max_violation(&constraints, &[-1.0, -2.0]), 0.0);
        assert_relative_eq!(max_violation(&constraints, &[0.5, 2.0]), 2.0);
        assert_eq!(max_violation(&[], &[]), 0.0);
    }
}
