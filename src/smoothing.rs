//! The smoothing-length / density solve (spec §4.5): a damped Newton
//! iteration on `h` against the standard `rho(h) = m (eta/h)^D` relation,
//! followed by a second pass computing the grad-h correction, sound speed,
//! the Balsara switch, and the gradients MUSCL reconstruction needs.

use crate::dimension::Dimension;
use crate::dimension::Vector;
use crate::error::SphError;
use crate::kernel::Kernel;
use crate::particle::NeighborIndex;
use crate::particle::SearchParticles;
use crate::tree::collector::Collector;
use crate::tree::query::radius_search;
use crate::tree::BhTree;

#[derive(Debug, Clone, Copy)]
pub struct SmoothingParams {
    /// Target neighbor count `eta^D` is tuned against.
    pub target_neighbors: f64,
    /// `eta` in `h = eta (m/rho)^(1/D)`.
    pub eta: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Collector capacity as a multiple of `target_neighbors`.
    pub neighbor_capacity_factor: f64,
    /// How far past the Newton support radius to search, as a multiple,
    /// so a single query usually suffices for the whole iteration.
    pub query_radius_factor: f64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            target_neighbors: 32.0,
            eta: 1.2,
            tolerance: 1e-3,
            max_iterations: 30,
            neighbor_capacity_factor: 4.0,
            query_radius_factor: 1.5,
        }
    }
}

pub struct FirstPassResult<D: Dimension> {
    pub smoothing_length: f64,
    pub density: f64,
    pub grad_h: f64,
    pub neighbors: Vec<(NeighborIndex, f64)>,
    pub truncated: bool,
    _marker: std::marker::PhantomData<D>,
}

fn kernel_sum<D: Dimension, K: Kernel>(
    position: D::Point,
    h: f64,
    search: &SearchParticles<D>,
    neighbors: &[(NeighborIndex, f64)],
) -> (f64, f64) {
    let d = D::NUM as f64;
    let mut density = 0.0;
    let mut drho_dh = 0.0;
    for &(idx, r2) in neighbors {
        let r = r2.sqrt();
        let other = &search[idx];
        let w = K::value::<D>(r, h);
        let dwdr = K::derivative::<D>(r, h);
        let dwdh = if r > 0.0 {
            -(d / h) * w - (r / h) * dwdr
        } else {
            -(d / h) * w
        };
        density += other.mass * w;
        drho_dh += other.mass * dwdh;
    }
    let _ = position;
    (density, drho_dh)
}

/// Solve for the smoothing length of a single particle by damped
/// Newton-Raphson on `f(h) = rho(h) - m (eta/h)^D`.
pub fn solve_smoothing_length<D: Dimension, K: Kernel>(
    position: D::Point,
    mass: f64,
    guess_h: f64,
    search: &SearchParticles<D>,
    tree: &BhTree<D, NeighborIndex>,
    params: &SmoothingParams,
) -> Result<FirstPassResult<D>, SphError> {
    let d = D::NUM as f64;
    let mut h = guess_h.max(1e-12);
    let capacity = ((params.target_neighbors * params.neighbor_capacity_factor).ceil() as usize).max(1);

    let mut last_neighbors: Vec<(NeighborIndex, f64)> = Vec::new();
    let mut last_truncated = false;
    let mut last_density = 0.0;

    for _ in 0..params.max_iterations {
        let query_radius = K::support_radius_in_h() * h * params.query_radius_factor;
        let mut collector: Collector<NeighborIndex> = Collector::with_capacity(capacity);
        radius_search(tree, position, query_radius, &mut collector);
        let neighbors = collector.into_sorted_by_distance();
        last_truncated = neighbors.len() >= capacity;

        let support = K::support_radius_in_h() * h;
        let within_support: Vec<(NeighborIndex, f64)> = neighbors
            .iter()
            .copied()
            .filter(|&(_, r2)| r2 <= support * support)
            .collect();

        let (density, drho_dh) = kernel_sum::<D, K>(position, h, search, &within_support);
        last_neighbors = within_support;
        last_density = density;

        let target_density = mass * (params.eta / h).powf(d);
        let f = density - target_density;
        let dtarget_dh = d * mass * params.eta.powf(d) / h.powf(d + 1.0);
        let fprime = drho_dh + dtarget_dh;

        if fprime.abs() < 1e-300 {
            break;
        }
        let mut delta = f / fprime;
        // Damp large steps so h never more than halves or doubles in one
        // iteration; this is what keeps the Newton iteration globally
        // convergent for the sharply nonlinear rho(h) relation.
        let max_step = 0.5 * h;
        if delta.abs() > max_step {
            delta = max_step * delta.signum();
        }
        let h_new = (h - delta).max(1e-12);

        if (h_new - h).abs() < params.tolerance * h {
            h = h_new;
            break;
        }
        h = h_new;
    }

    if last_density <= 0.0 && mass > 0.0 {
        return Err(SphError::ConvergenceFailure {
            detail: "smoothing-length solve produced non-positive density".to_string(),
        });
    }

    let drho_dh_final = kernel_sum::<D, K>(position, h, search, &last_neighbors).1;
    let grad_h = if (d * last_density + h * drho_dh_final).abs() > 1e-300 {
        1.0 / (1.0 + (h / (d * last_density)) * drho_dh_final)
    } else {
        1.0
    };

    Ok(FirstPassResult {
        smoothing_length: h,
        density: last_density,
        grad_h,
        neighbors: last_neighbors,
        truncated: last_truncated,
        _marker: std::marker::PhantomData,
    })
}

/// Gradients needed downstream: by the Balsara switch (velocity
/// divergence/curl), and by GSPH's MUSCL reconstruction (density and
/// pressure gradients, full velocity gradient).
#[derive(Debug, Clone)]
pub struct Gradients<D: Dimension> {
    pub density: D::Point,
    pub pressure: D::Point,
    /// `velocity[k]` is `grad(v_k)`, the gradient of the k-th velocity
    /// component; length `D::NUM`.
    pub velocity: Vec<D::Point>,
    pub divergence_v: f64,
    /// Magnitude of the curl of `v`; in 1D this is always zero.
    pub curl_v_magnitude: f64,
}

pub fn compute_gradients<D: Dimension, K: Kernel>(
    position: D::Point,
    h: f64,
    density: f64,
    pressure: f64,
    velocity: D::Point,
    search: &SearchParticles<D>,
    neighbors: &[(NeighborIndex, f64)],
) -> Gradients<D> {
    let mut grad_density = D::Point::ZERO;
    let mut grad_pressure = D::Point::ZERO;
    let mut grad_velocity: Vec<D::Point> = vec![D::Point::ZERO; D::NUM];
    let mut divergence_v = 0.0;

    for &(idx, r2) in neighbors {
        let other = &search[idx];
        let r = r2.sqrt();
        if r <= 0.0 || other.density <= 0.0 {
            continue;
        }
        let dwdr = K::derivative::<D>(r, h);
        let separation = position - other.position;
        let grad_w = separation * (dwdr / r);
        let volume_j = other.mass / other.density;

        grad_density = grad_density + grad_w * (volume_j * (other.density - density));
        grad_pressure = grad_pressure + grad_w * (volume_j * (other.pressure - pressure));

        for k in 0..D::NUM {
            let dv_k = other.velocity.component(k) - velocity.component(k);
            grad_velocity[k] = grad_velocity[k] + grad_w * (volume_j * dv_k);
        }
        let dv = other.velocity - velocity;
        divergence_v += volume_j * dv.dot(grad_w);
    }

    let curl_v_magnitude = match D::NUM {
        1 => 0.0,
        2 => {
            // curl of a 2D vector field is a scalar: dvy/dx - dvx/dy.
            let dvy_dx = grad_velocity[1].component(0);
            let dvx_dy = grad_velocity[0].component(1);
            (dvy_dx - dvx_dy).abs()
        }
        3 => {
            let dvz_dy = grad_velocity[2].component(1);
            let dvy_dz = grad_velocity[1].component(2);
            let dvx_dz = grad_velocity[0].component(2);
            let dvz_dx = grad_velocity[2].component(0);
            let dvy_dx = grad_velocity[1].component(0);
            let dvx_dy = grad_velocity[0].component(1);
            let cx = dvz_dy - dvy_dz;
            let cy = dvx_dz - dvz_dx;
            let cz = dvy_dx - dvx_dy;
            (cx * cx + cy * cy + cz * cz).sqrt()
        }
        _ => unreachable!(),
    };

    Gradients {
        density: grad_density,
        pressure: grad_pressure,
        velocity: grad_velocity,
        divergence_v,
        curl_v_magnitude,
    }
}

/// The Balsara (1995) switch, suppressing artificial viscosity in pure
/// shear flows: close to 1 near shocks, close to 0 in shear.
pub fn balsara_switch(divergence_v: f64, curl_v_magnitude: f64, sound_speed: f64, h: f64) -> f64 {
    let eps = 1e-4 * sound_speed / h;
    divergence_v.abs() / (divergence_v.abs() + curl_v_magnitude + eps)
}

pub fn sound_speed(gamma: f64, pressure: f64, density: f64) -> f64 {
    if density <= 0.0 {
        0.0
    } else {
        (gamma * pressure / density).max(0.0).sqrt()
    }
}
