//! Standard (density-energy) SPH: the grad-h corrected pressure force and
//! energy equation of Springel & Hernquist (2002) / Price (2012), plus
//! Monaghan artificial viscosity and conductivity.

use crate::dimension::Dimension;
use crate::dimension::Vector;
use crate::kernel::Kernel;
use crate::sph::artificial_conductivity;
use crate::sph::monaghan_viscosity;
use crate::sph::signal_velocity;
use crate::sph::ArtificialViscosityParams;
use crate::sph::PairContribution;

#[derive(Debug, Clone, Copy)]
pub struct ParticleState<D: Dimension> {
    pub position: D::Point,
    pub velocity: D::Point,
    pub mass: f64,
    pub density: f64,
    pub pressure: f64,
    pub energy: f64,
    pub smoothing_length: f64,
    pub sound_speed: f64,
    pub grad_h: f64,
    pub balsara: f64,
}

/// The SSPH pair contribution of neighbor `j` to particle `i`.
pub fn pair_contribution<D: Dimension, K: Kernel>(
    i: &ParticleState<D>,
    j: &ParticleState<D>,
    av: &ArtificialViscosityParams,
) -> PairContribution<D> {
    let separation = i.position - j.position;
    let r = separation.length();
    if r <= 0.0 || i.density <= 0.0 || j.density <= 0.0 {
        return PairContribution::zero();
    }
    let velocity_diff = i.velocity - j.velocity;

    let dwdr_i = K::derivative::<D>(r, i.smoothing_length);
    let dwdr_j = K::derivative::<D>(r, j.smoothing_length);
    let grad_w_i = separation * (dwdr_i / r);
    let grad_w_j = separation * (dwdr_j / r);
    let grad_w_bar = (grad_w_i + grad_w_j) * 0.5;

    let pressure_term_i = i.pressure / (i.grad_h * i.density * i.density);
    let pressure_term_j = j.pressure / (j.grad_h * j.density * j.density);

    let pi_ij = monaghan_viscosity::<D>(
        separation,
        velocity_diff,
        r,
        i.density,
        j.density,
        i.sound_speed,
        j.sound_speed,
        i.smoothing_length,
        j.smoothing_length,
        i.balsara,
        j.balsara,
        av,
    );

    let acceleration = (grad_w_i * pressure_term_i + grad_w_j * pressure_term_j) * (-j.mass)
        - grad_w_bar * (j.mass * pi_ij);

    let v_sig = signal_velocity::<D>(separation, velocity_diff, r, i.sound_speed, j.sound_speed);
    let conductivity = artificial_conductivity(
        i.energy,
        j.energy,
        i.density,
        j.density,
        v_sig,
        av.conductivity_alpha,
    );

    let denergy_dt = j.mass * pressure_term_i * velocity_diff.dot(grad_w_i)
        + 0.5 * j.mass * pi_ij * velocity_diff.dot(grad_w_bar)
        + (j.mass / j.density) * conductivity * grad_w_bar.length();

    PairContribution {
        acceleration,
        denergy_dt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::OneD;
    use crate::kernel::CubicSpline;

    fn state(x: f64) -> ParticleState<OneD> {
        ParticleState {
            position: x,
            velocity: 0.0,
            mass: 1.0,
            density: 1.0,
            pressure: 1.0,
            energy: 1.0,
            smoothing_length: 1.0,
            sound_speed: 1.0,
            grad_h: 1.0,
            balsara: 1.0,
        }
    }

    #[test]
    fn symmetric_particles_feel_opposite_forces() {
        let av = ArtificialViscosityParams::default();
        let left = state(-0.1);
        let right = state(0.1);
        let force_on_left = pair_contribution::<OneD, CubicSpline>(&left, &right, &av);
        let force_on_right = pair_contribution::<OneD, CubicSpline>(&right, &left, &av);
        assert!((force_on_left.acceleration + force_on_right.acceleration).abs() < 1e-10);
    }

    #[test]
    fn zero_separation_has_no_contribution() {
        let av = ArtificialViscosityParams::default();
        let a = state(0.0);
        let b = state(0.0);
        let result = pair_contribution::<OneD, CubicSpline>(&a, &b, &av);
        assert_eq!(result.acceleration, 0.0);
    }
}
