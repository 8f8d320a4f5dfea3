use mdo_core::{Constraint, ConstraintKind};

use super::Config;

/// One scalar condition derived from a declared constraint.
///
/// A range constraint yields two inequality terms.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Term {
    /// `sign * (value - limit) <= 0`
    Inequality {
        constraint: usize,
        limit: f64,
        sign: f64,
    },

    /// `value - target == 0`
    Equality { constraint: usize, target: f64 },
}

impl Term {
    fn residual(self, values: &[f64]) -> f64 {
        match self {
            Self::Inequality {
                constraint,
                limit,
                sign,
            } => sign * (values[constraint] - limit),
            Self::Equality { constraint, target } => values[constraint] - target,
        }
    }
}

/// Augmented Lagrangian state: multipliers and penalty weight.
#[derive(Debug, Clone)]
pub(super) struct Lagrangian {
    terms: Vec<Term>,
    multipliers: Vec<f64>,
    penalty: f64,
    factor: f64,
    cap: f64,
}

impl Lagrangian {
    pub(super) fn new(constraints: &[Constraint], config: &Config) -> Self {
        let terms: Vec<Term> = constraints
            .iter()
            .enumerate()
            .flat_map(|(constraint, c)| {
                let upper = |limit| Term::Inequality {
                    constraint,
                    limit,
                    sign: 1.0,
                };
                let lower = |limit| Term::Inequality {
                    constraint,
                    limit,
                    sign: -1.0,
                };
                match c.kind() {
                    ConstraintKind::Upper(limit) => vec![upper(limit)],
                    ConstraintKind::Lower(limit) => vec![lower(limit)],
                    ConstraintKind::Range { lower: lo, upper: hi } => vec![lower(lo), upper(hi)],
                    ConstraintKind::Equals(target) => vec![Term::Equality { constraint, target }],
                }
            })
            .collect();

        Self {
            multipliers: vec![0.0; terms.len()],
            terms,
            penalty: config.penalty_init(),
            factor: config.penalty_factor(),
            cap: config.penalty_max(),
        }
    }

    pub(super) fn penalty(&self) -> f64 {
        self.penalty
    }

    /// The term added to the objective for constraint `values`.
    ///
    /// Inequalities contribute `(μ/2) max(0, λ/μ + g)² − λ²/(2μ)` and
    /// equalities `λh + (μ/2)h²`.
    pub(super) fn augment(&self, values: &[f64]) -> f64 {
        let mu = self.penalty;
        self.terms
            .iter()
            .zip(&self.multipliers)
            .map(|(term, &lambda)| {
                let r = term.residual(values);
                match term {
                    Term::Inequality { .. } => {
                        let shifted = (lambda / mu + r).max(0.0);
                        0.5 * mu * shifted * shifted - lambda * lambda / (2.0 * mu)
                    }
                    Term::Equality { .. } => lambda * r + 0.5 * mu * r * r,
                }
            })
            .sum()
    }

    /// Updates the multipliers at `values`, then grows the penalty unless the
    /// violation fell to a quarter of its previous value.
    pub(super) fn update(&mut self, values: &[f64], violation: f64, previous: f64) {
        let mu = self.penalty;
        for (term, lambda) in self.terms.iter().zip(&mut self.multipliers) {
            let r = term.residual(values);
            *lambda = match term {
                Term::Inequality { .. } => (*lambda + mu * r).max(0.0),
                Term::Equality { .. } => *lambda + mu * r,
            };
        }

        if violation > 0.25 * previous {
            self.penalty = (self.penalty * self.factor).min(self.cap);
        }
    }

    #[cfg(test)]
    fn multipliers(&self) -> &[f64] {
        &self.multipliers
    }
}
