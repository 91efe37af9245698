//! Timestep controller (spec §4.8): a Courant-Friedrichs-Lewy bound and a
//! force/acceleration bound, combined by taking the global minimum across
//! all real particles.

use rayon::prelude::*;

use crate::dimension::Dimension;
use crate::dimension::Vector;
use crate::particle::Particle;

pub const COURANT_FACTOR: f64 = 0.3;
pub const FORCE_FACTOR: f64 = 0.125;

#[derive(Debug, Clone, Copy)]
pub struct TimestepParams {
    pub courant_factor: f64,
    pub force_factor: f64,
    pub max_timestep: f64,
}

impl Default for TimestepParams {
    fn default() -> Self {
        Self {
            courant_factor: COURANT_FACTOR,
            force_factor: FORCE_FACTOR,
            max_timestep: f64::INFINITY,
        }
    }
}

/// `dt_c = C_c * h / (h|div v| + c + 1.2*(alpha*c + beta*h|div v|))`
/// (spec §4.8): the plain sound-crossing time shortened by the
/// signal-velocity terms that dominate in a strong shock, where `alpha` is
/// each particle's own (possibly time-dependent) artificial viscosity
/// coefficient and `beta` is the formulation's fixed AV beta coefficient.
fn courant_bound<D: Dimension>(p: &Particle<D>, params: &TimestepParams, viscosity_beta: f64) -> f64 {
    let div_v = p.velocity_divergence.abs();
    let denom = p.smoothing_length * div_v
        + p.sound_speed
        + 1.2 * (p.alpha * p.sound_speed + viscosity_beta * p.smoothing_length * div_v);
    if denom <= 0.0 {
        return f64::INFINITY;
    }
    params.courant_factor * p.smoothing_length / denom
}

fn force_bound<D: Dimension>(p: &Particle<D>, params: &TimestepParams) -> f64 {
    let a = p.acceleration.length();
    if a <= 0.0 {
        return f64::INFINITY;
    }
    params.force_factor * (p.smoothing_length / a).sqrt()
}

/// The global timestep: the smallest per-particle bound over every real
/// particle, clamped to `params.max_timestep`. `viscosity_beta` is the
/// active formulation's artificial viscosity beta coefficient (0 for GSPH,
/// which has no discrete AV term).
pub fn compute_timestep<D: Dimension>(
    real: &[Particle<D>],
    params: &TimestepParams,
    viscosity_beta: f64,
) -> f64 {
    let smallest = real
        .par_iter()
        .map(|p| courant_bound(p, params, viscosity_beta).min(force_bound(p, params)))
        .reduce(|| f64::INFINITY, f64::min);
    smallest.min(params.max_timestep)
}
