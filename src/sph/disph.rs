//! Density-independent (pressure-energy) SPH, following Saitoh & Makino
//! (2013): the smoothed quantity is pressure itself rather than density,
//! using `Y_i = m_i * u_i` (mass times specific energy) as the volume
//! variable the kernel sum runs over. This avoids the spurious surface
//! tension ("E0/E1") error standard density-energy SPH produces at contact
//! discontinuities between fluids of different density, since pressure
//! (the physically continuous quantity there) is smoothed directly instead
//! of being derived from a discontinuously-smoothed density.

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
    pub energy: f64,
    pub pressure: f64,
    pub smoothing_length: f64,
    pub sound_speed: f64,
    pub density: f64,
    pub balsara: f64,
    /// grad-h correction for the Y-weighted smoothing, analogous to
    /// `grad_h` in the density-energy formulation but computed against
    /// `Y = m * u` rather than `rho`.
    pub y_grad_h: f64,
}

impl<D: Dimension> ParticleState<D> {
    fn volume_element(&self) -> f64 {
        self.mass * self.energy
    }
}

#[allow(clippy::too_many_arguments)]
pub fn pair_contribution<D: Dimension, K: Kernel>(
    i: &ParticleState<D>,
    j: &ParticleState<D>,
    gamma: f64,
    av: &ArtificialViscosityParams,
) -> PairContribution<D> {
    let separation = i.position - j.position;
    let r = separation.length();
    if r <= 0.0 || i.pressure <= 0.0 || j.pressure <= 0.0 {
        return PairContribution::zero();
    }
    let velocity_diff = i.velocity - j.velocity;

    let dwdr_i = K::derivative::<D>(r, i.smoothing_length);
    let dwdr_j = K::derivative::<D>(r, j.smoothing_length);
    let grad_w_i = separation * (dwdr_i / r);
    let grad_w_j = separation * (dwdr_j / r);
    let grad_w_bar = (grad_w_i + grad_w_j) * 0.5;

    let y_i = i.volume_element();
    let y_j = j.volume_element();

    let term_i = i.energy * i.y_grad_h / i.pressure;
    let term_j = j.energy * j.y_grad_h / j.pressure;

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

    let acceleration = (grad_w_i * term_i + grad_w_j * term_j) * (-(gamma - 1.0) * y_j)
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

    let denergy_dt = (gamma - 1.0) * term_i * y_j * velocity_diff.dot(grad_w_i)
        + 0.5 * j.mass * pi_ij * velocity_diff.dot(grad_w_bar)
        + (j.mass / j.density.max(1e-300)) * conductivity * grad_w_bar.length();

    PairContribution {
        acceleration,
        denergy_dt,
    }
}
