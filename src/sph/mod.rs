//! Fluid-force evaluation: the three interchangeable formulations (SSPH,
//! DISPH, GSPH) plus the artificial viscosity/conductivity shared by the
//! two kernel-based formulations.
//!
//! The ghost-inclusion invariant from spec §4.6 applies uniformly here: a
//! neighbor list handed to any of these functions may contain ghost
//! particles (their contributions to the force/energy sums are physically
//! required), but the particle's own `neighbor_count` used for the
//! smoothing-length convergence test in `smoothing.rs` must only ever
//! count the subset that are real, which is enforced at the call site in
//! `driver.rs`, not here.

pub mod disph;
pub mod gsph;
pub mod riemann;
pub mod ssph;

use crate::dimension::Dimension;
use crate::dimension::Vector;

/// Net contribution of one ordered pair `(i, j)` to particle `i`'s
/// acceleration and rate of specific-energy change.
#[derive(Debug, Clone, Copy)]
pub struct PairContribution<D: Dimension> {
    pub acceleration: D::Point,
    pub denergy_dt: f64,
}

impl<D: Dimension> PairContribution<D> {
    pub fn zero() -> Self {
        Self {
            acceleration: D::Point::ZERO,
            denergy_dt: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ArtificialViscosityParams {
    pub alpha: f64,
    pub beta: f64,
    /// Conductivity coefficient (independent from the AV alpha above).
    pub conductivity_alpha: f64,
}

impl Default for ArtificialViscosityParams {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 2.0,
            conductivity_alpha: 1.0,
        }
    }
}

/// The signal-velocity artificial viscosity `Pi_ij` (Monaghan 1997), scaled
/// by the Balsara switch of both particles.
#[allow(clippy::too_many_arguments)]
pub fn monaghan_viscosity<D: Dimension>(
    separation: D::Point,
    velocity_diff: D::Point,
    r: f64,
    density_i: f64,
    density_j: f64,
    sound_speed_i: f64,
    sound_speed_j: f64,
    h_i: f64,
    h_j: f64,
    balsara_i: f64,
    balsara_j: f64,
    params: &ArtificialViscosityParams,
) -> f64 {
    let v_dot_r = velocity_diff.dot(separation);
    if v_dot_r >= 0.0 {
        return 0.0;
    }
    let h_bar = 0.5 * (h_i + h_j);
    let eta_sq = 0.01 * h_bar * h_bar;
    let mu_ij = h_bar * v_dot_r / (r * r + eta_sq);
    let c_bar = 0.5 * (sound_speed_i + sound_speed_j);
    let rho_bar = 0.5 * (density_i + density_j);
    let balsara_bar = 0.5 * (balsara_i + balsara_j);
    let pi = (-params.alpha * c_bar * mu_ij + params.beta * mu_ij * mu_ij) / rho_bar;
    pi * balsara_bar
}

/// Artificial conductivity smoothing specific-energy discontinuities at
/// contact discontinuities (Price 2008).
pub fn artificial_conductivity(
    energy_i: f64,
    energy_j: f64,
    density_i: f64,
    density_j: f64,
    v_sig: f64,
    alpha_cond: f64,
) -> f64 {
    let rho_bar = 0.5 * (density_i + density_j);
    alpha_cond * v_sig * (energy_i - energy_j) / rho_bar
}

/// Signal velocity used both by the Monaghan viscosity's timestep
/// constraint and by artificial conductivity.
pub fn signal_velocity<D: Dimension>(
    separation: D::Point,
    velocity_diff: D::Point,
    r: f64,
    sound_speed_i: f64,
    sound_speed_j: f64,
) -> f64 {
    let v_dot_r = velocity_diff.dot(separation) / r.max(1e-300);
    sound_speed_i + sound_speed_j - 3.0 * v_dot_r.min(0.0)
}

/// Time-dependent decay of the per-particle artificial-viscosity
/// coefficient toward `alpha_min`, switched up to `alpha_max` by shocks
/// (Morris & Monaghan 1997).
pub fn alpha_rate_of_change(
    alpha: f64,
    alpha_min: f64,
    alpha_max: f64,
    divergence_v: f64,
    sound_speed: f64,
    h: f64,
    decay_time_constant: f64,
) -> f64 {
    let source = (-divergence_v).max(0.0) * (alpha_max - alpha);
    let tau = h / (decay_time_constant * sound_speed.max(1e-300));
    source - (alpha - alpha_min) / tau
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::OneD;

    #[test]
    fn viscosity_is_zero_for_receding_particles() {
        let params = ArtificialViscosityParams::default();
        let pi = monaghan_viscosity::<OneD>(
            1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.1, 0.1, 1.0, 1.0, &params,
        );
        assert_eq!(pi, 0.0);
    }

    #[test]
    fn viscosity_is_negative_for_approaching_particles() {
        let params = ArtificialViscosityParams::default();
        // separation positive, velocity_diff negative => approaching
        let pi = monaghan_viscosity::<OneD>(
            1.0, -1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.1, 0.1, 1.0, 1.0, &params,
        );
        assert!(pi < 0.0);
    }
}
