//! Maps between bounded design values `x` and unconstrained parameters `θ`.

use mdo_core::{Bounds, DesignSpace};

/// Keeps the inverse maps away from the saturated ends.
const EDGE: f64 = 1e-9;

/// Slope `dx/dθ` below which a map is considered saturated.
const SATURATED: f64 = 0.05;

/// Fraction of an interval from the near bound where a released value lands.
const RELEASE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Transform {
    /// `x = θ`
    Identity,

    /// `x = lower + softplus(θ)`
    Lower(f64),

    /// `x = upper - softplus(θ)`
    Upper(f64),

    /// `x = lower + w σ(4θ / w)` with `w = upper - lower`, so the slope is
    /// 1 at the midpoint.
    Interval { lower: f64, upper: f64 },

    /// `lower == upper`; `θ` is ignored.
    Fixed(f64),
}

impl Transform {
    fn new(bounds: Bounds) -> Self {
        let (lower, upper) = (bounds.lower(), bounds.upper());
        match (lower.is_finite(), upper.is_finite()) {
            (true, true) if lower == upper => Self::Fixed(lower),
            (true, true) => Self::Interval { lower, upper },
            (true, false) => Self::Lower(lower),
            (false, true) => Self::Upper(upper),
            (false, false) => Self::Identity,
        }
    }

    fn to_x(self, theta: f64) -> f64 {
        match self {
            Self::Identity => theta,
            Self::Lower(lower) => lower + softplus(theta),
            Self::Upper(upper) => upper - softplus(theta),
            Self::Interval { lower, upper } => {
                let width = upper - lower;
                lower + width * logistic(4.0 * theta / width)
            }
            Self::Fixed(value) => value,
        }
    }

    fn to_theta(self, x: f64) -> f64 {
        match self {
            Self::Identity => x,
            Self::Lower(lower) => softplus_inv((x - lower).max(EDGE)),
            Self::Upper(upper) => softplus_inv((upper - x).max(EDGE)),
            Self::Interval { lower, upper } => {
                let fraction = ((x - lower) / (upper - lower)).clamp(EDGE, 1.0 - EDGE);
                logit(fraction) * (upper - lower) / 4.0
            }
            Self::Fixed(_) => 0.0,
        }
    }

    /// `dx/dθ`.
    fn slope(self, theta: f64) -> f64 {
        match self {
            Self::Identity => 1.0,
            Self::Lower(_) | Self::Upper(_) => logistic(theta),
            Self::Interval { lower, upper } => {
                let s = logistic(4.0 * theta / (upper - lower));
                4.0 * s * (1.0 - s)
            }
            Self::Fixed(_) => 0.0,
        }
    }

    /// A `θ` on the shoulder of the map, on the side of the bound `theta` is
    /// pressed against.
    fn release(self, theta: f64) -> f64 {
        match self {
            Self::Identity | Self::Fixed(_) => theta,
            Self::Lower(_) | Self::Upper(_) => 0.0,
            Self::Interval { lower, upper } => {
                let shoulder = logit(RELEASE) * (upper - lower) / 4.0;
                if theta < 0.0 { shoulder } else { -shoulder }
            }
        }
    }
}

/// The per-element reparameterization of a design space.
#[derive(Debug, Clone)]
pub(super) struct Reparam<const N: usize> {
    transforms: [Transform; N],
    bounds: [Bounds; N],
}

impl<const N: usize> Reparam<N> {
    pub(super) fn new(space: &DesignSpace<N>) -> Self {
        let bounds = *space.bounds();
        Self {
            transforms: bounds.map(Transform::new),
            bounds,
        }
    }

    /// Maps `θ` to a design that is always within bounds.
    pub(super) fn to_x(&self, theta: &[f64]) -> [f64; N] {
        std::array::from_fn(|i| self.bounds[i].clamp(self.transforms[i].to_x(theta[i])))
    }

    pub(super) fn to_theta(&self, x: &[f64; N]) -> Vec<f64> {
        self.transforms
            .iter()
            .zip(x)
            .map(|(transform, &value)| transform.to_theta(value))
            .collect()
    }

    /// Projects `x - step` onto the bounds.
    pub(super) fn project(&self, x: &[f64; N], step: &[f64]) -> [f64; N] {
        std::array::from_fn(|i| self.bounds[i].clamp(x[i] - step[i]))
    }

    /// Whether element `index` sits in a flat tail of its map, where the
    /// gradient in `θ` no longer reflects the gradient in `x`.
    pub(super) fn is_saturated(&self, theta: &[f64], index: usize) -> bool {
        self.transforms[index].slope(theta[index]) < SATURATED
    }

    /// Moves element `index` out of a saturated tail, back toward the
    /// interior.
    pub(super) fn release(&self, theta: &mut [f64], index: usize) {
        theta[index] = self.transforms[index].release(theta[index]);
    }
}

fn logistic(theta: f64) -> f64 {
    if theta >= 0.0 {
        1.0 / (1.0 + (-theta).exp())
    } else {
        let e = theta.exp();
        e / (1.0 + e)
    }
}

fn logit(fraction: f64) -> f64 {
    (fraction / (1.0 - fraction)).ln()
}

fn softplus(theta: f64) -> f64 {
    if theta > 20.0 { theta } else { theta.exp().ln_1p() }
}

fn softplus_inv(y: f64) -> f64 {
    if y > 20.0 { y } else { y.exp_m1().ln() }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn space() -> DesignSpace<4> {
        DesignSpace::builder()
            .scalar("free", f64::NEG_INFINITY, f64::INFINITY)
            .scalar("positive", 0.0, f64::INFINITY)
            .scalar("interval", -4.0, 4.0)
            .scalar("fixed", 2.0, 2.0)
            .build()
            .expect("valid space")
    }

    #[test]
    fn interior_points_survive_the_round_trip() {
        let map = Reparam::new(&space());
        let x = [-12.5, 3.0, 1.5, 2.0];
        let back = map.to_x(&map.to_theta(&x));

        for (a, b) in x.into_iter().zip(back) {
            assert_relative_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn any_theta_lands_within_bounds() {
        let space = space();
        let map = Reparam::new(&space);
        for theta in [-1e3, -30.0, 0.0, 30.0, 1e3] {
            let x = map.to_x(&[theta; 4]);
            assert!(space.check(&x).is_ok(), "{x:?}");
        }
    }

    #[test]
    fn points_on_a_bound_map_to_finite_theta() {
        let map = Reparam::new(&space());
        let theta = map.to_theta(&[0.0, 0.0, -4.0, 2.0]);
        assert!(theta.iter().all(|t| t.is_finite()));
    }

    #[test]
    fn interval_midpoint_is_theta_zero() {
        let map = Reparam::new(&space());
        assert_relative_eq!(map.to_theta(&[0.0, 1.0, 0.0, 2.0])[2], 0.0);
        assert_relative_eq!(map.to_x(&[0.0; 4])[2], 0.0);
    }

    #[test]
    fn interval_slope_is_one_at_the_midpoint() {
        let map = Reparam::new(&space());
        let theta = [0.0; 4];
        let h = 1e-6;
        let up = map.to_x(&[0.0, 0.0, h, 0.0])[2];
        let down = map.to_x(&[0.0, 0.0, -h, 0.0])[2];
        assert_relative_eq!((up - down) / (2.0 * h), 1.0, epsilon = 1e-6);
        assert!(!map.is_saturated(&theta, 2));
    }

    #[test]
    fn released_elements_leave_the_tail() {
        let map = Reparam::new(&space());
        let mut theta = map.to_theta(&[0.0, 1e-9, 4.0 - 1e-9, 2.0]);
        assert!(map.is_saturated(&theta, 1));
        assert!(map.is_saturated(&theta, 2));

        map.release(&mut theta, 1);
        map.release(&mut theta, 2);
        assert!(!map.is_saturated(&theta, 1));
        assert!(!map.is_saturated(&theta, 2));

        // Each element stays on the side of the bound it was pressed against.
        let x = map.to_x(&theta);
        assert!(x[1] > 0.0 && x[1] < 1.0);
        assert_relative_eq!(x[2], 4.0 - 0.1 * 8.0, epsilon = 1e-12);
    }

    #[test]
    fn projection_stops_at_the_bounds() {
        let map = Reparam::new(&space());
        let x = map.project(&[0.0, 0.5, 3.0, 2.0], &[1.0, 2.0, -3.0, 0.0]);
        assert_eq!(x, [-1.0, 0.0, 4.0, 2.0]);
    }
}
