//! SPH smoothing kernels.
//!
//! Both kernels are normalized per spatial dimension the way the standard
//! SPH literature (and `splashsurf_lib::kernel`) does it: the same shape
//! function `f(q)` is paired with a dimension-dependent normalization
//! constant `sigma`, so the same kernel implementation generalizes across
//! `OneD`/`TwoD`/`ThreeD` instead of being duplicated per dimension the way
//! the teacher's fixed 2D poly6/spiky pair was.

use crate::dimension::Dimension;

/// A radial SPH kernel `W(r, h)` and its radial derivative `dW/dr`.
pub trait Kernel {
    /// Value of `W` at separation `r` with smoothing length `h`.
    fn value<D: Dimension>(r: f64, h: f64) -> f64;

    /// `dW/dr` at separation `r` with smoothing length `h`.
    fn derivative<D: Dimension>(r: f64, h: f64) -> f64;

    /// Compact support radius in units of `h`.
    fn support_radius_in_h() -> f64;
}

fn sigma<D: Dimension>(cubic: bool) -> f64 {
    match (D::NUM, cubic) {
        (1, true) => 2.0 / 3.0,
        (2, true) => 10.0 / (7.0 * std::f64::consts::PI),
        (3, true) => 1.0 / std::f64::consts::PI,
        (1, false) => 3.0 / 2.0,
        (2, false) => 7.0 / (4.0 * std::f64::consts::PI),
        (3, false) => 21.0 / (16.0 * std::f64::consts::PI),
        _ => unreachable!("Dimension::NUM is always 1, 2 or 3"),
    }
}

/// The standard cubic B-spline kernel (Monaghan & Lattanzio 1985).
pub struct CubicSpline;

impl Kernel for CubicSpline {
    fn value<D: Dimension>(r: f64, h: f64) -> f64 {
        let q = r / h;
        let sigma = sigma::<D>(true) / h.powi(D::NUM as i32);
        let shape = if q < 1.0 {
            1.0 - 1.5 * q * q + 0.75 * q * q * q
        } else if q < 2.0 {
            0.25 * (2.0 - q).powi(3)
        } else {
            0.0
        };
        sigma * shape
    }

    fn derivative<D: Dimension>(r: f64, h: f64) -> f64 {
        let q = r / h;
        let sigma = sigma::<D>(true) / h.powi(D::NUM as i32 + 1);
        let shape = if q < 1.0 {
            -3.0 * q + 2.25 * q * q
        } else if q < 2.0 {
            -0.75 * (2.0 - q).powi(2)
        } else {
            0.0
        };
        sigma * shape
    }

    fn support_radius_in_h() -> f64 {
        2.0
    }
}

/// The Wendland C4 kernel (Wendland 1995), preferred for its resistance to
/// pairing instability at high neighbor counts.
pub struct WendlandC4;

impl Kernel for WendlandC4 {
    fn value<D: Dimension>(r: f64, h: f64) -> f64 {
        let q = (r / h).min(1.0);
        let sigma = sigma::<D>(false) / h.powi(D::NUM as i32);
        let one_minus_q = 1.0 - q;
        let shape = one_minus_q.powi(6) * (1.0 + 6.0 * q + 35.0 / 3.0 * q * q);
        sigma * shape
    }

    fn derivative<D: Dimension>(r: f64, h: f64) -> f64 {
        let q = (r / h).min(1.0);
        let sigma = sigma::<D>(false) / h.powi(D::NUM as i32 + 1);
        let one_minus_q = 1.0 - q;
        // d/dq [(1-q)^6 (1 + 6q + 35/3 q^2)]
        let shape = -6.0 * one_minus_q.powi(5) * (1.0 + 6.0 * q + 35.0 / 3.0 * q * q)
            + one_minus_q.powi(6) * (6.0 + 70.0 / 3.0 * q);
        sigma * shape
    }

    fn support_radius_in_h() -> f64 {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::OneD;
    use crate::dimension::ThreeD;
    use crate::dimension::TwoD;

    fn integrate_1d(h: f64) -> f64 {
        let n = 20000;
        let dr = 4.0 * h / n as f64;
        (0..n)
            .map(|i| {
                let r = (i as f64 + 0.5) * dr - 2.0 * h;
                CubicSpline::value::<OneD>(r.abs(), h) * dr
            })
            .sum()
    }

    #[test]
    fn cubic_spline_normalizes_to_one_in_1d() {
        let integral = integrate_1d(1.0);
        assert!((integral - 1.0).abs() < 1e-3, "integral was {integral}");
    }

    #[test]
    fn kernel_vanishes_at_support_radius() {
        let h = 1.0;
        assert_eq!(CubicSpline::value::<TwoD>(2.0 * h, h), 0.0);
        assert_eq!(WendlandC4::value::<ThreeD>(1.0 * h, h), 0.0);
    }

    #[test]
    fn kernel_is_positive_at_origin() {
        assert!(CubicSpline::value::<ThreeD>(0.0, 1.0) > 0.0);
        assert!(WendlandC4::value::<ThreeD>(0.0, 1.0) > 0.0);
    }

    #[test]
    fn derivative_is_zero_at_origin_by_symmetry() {
        // The radial derivative convention used here is dW/dr for r >= 0;
        // callers multiply by the unit separation vector, which is zero
        // length at r=0, so the only requirement is that it stays finite.
        assert!(CubicSpline::derivative::<TwoD>(0.0, 1.0).is_finite());
    }
}
