//! The simulation driver (spec §4.1): owns the particle store, runs the
//! ghost/tree/smoothing/force pipeline each step, and advances the system
//! with a predictor-corrector integrator.

use rayon::prelude::*;

use crate::dimension::Dimension;
use crate::dimension::Vector;
use crate::error::NonFatalReport;
use crate::error::SphError;
use crate::error::SphLog;
use crate::extent::Extent;
use crate::ghost::GhostManager;
use crate::gravity;
use crate::kernel::CubicSpline;
use crate::kernel::Kernel;
use crate::kernel::WendlandC4;
use crate::output::OutputSink;
use crate::parameters::FormulationParams;
use crate::parameters::KernelKind;
use crate::parameters::ParameterBundle;
use crate::particle::NeighborIndex;
use crate::particle::Particle;
use crate::particle::ParticleKind;
use crate::particle::SearchParticles;
use crate::smoothing;
use crate::sph;
use crate::sph::disph;
use crate::sph::gsph;
use crate::sph::ssph;
use crate::sph::PairContribution;
use crate::timestep;
use crate::tree::BhTree;
use crate::tree::TreeConfig;
use crate::tree::TreePoint;

/// Per-particle force/energy derivatives for one state evaluation, kept
/// separate from `Particle` itself so the predictor and corrector stages
/// can combine two evaluations without a particle's own fields getting in
/// the way.
#[derive(Debug, Clone, Copy)]
struct Derivative<D: Dimension> {
    acceleration: D::Point,
    denergy_dt: f64,
}

/// Tolerance for "has the scheduled output time been reached", to absorb
/// floating-point drift in the accumulated `self.time` rather than missing
/// an emission by a fraction of an ULP.
const OUTPUT_TIME_EPSILON: f64 = 1e-9;

pub struct Sim<D: Dimension> {
    real: Vec<Particle<D>>,
    params: ParameterBundle<D>,
    ghosts: GhostManager<D>,
    tree_config: TreeConfig,
    time: f64,
    step_count: u64,
    next_particle_output_time: f64,
    next_energy_output_time: f64,
    /// Whether the t=0 snapshot (spec §4.8/S6: "never step past the next
    /// scheduled output time" implies the initial state is itself emitted)
    /// has been written yet.
    initial_output_emitted: bool,
    /// Density/pressure gradients of each real particle from the most
    /// recent force evaluation; consumed by GSPH's MUSCL reconstruction.
    /// Left at zero (first-order) by the other two formulations.
    gradients: Vec<smoothing::Gradients<D>>,
}

impl<D: Dimension> Sim<D> {
    pub fn new(real: Vec<Particle<D>>, params: ParameterBundle<D>) -> Self {
        let ghosts = GhostManager::new(params.boundary.clone());
        let gradients = (0..real.len())
            .map(|_| smoothing::Gradients {
                density: D::Point::ZERO,
                pressure: D::Point::ZERO,
                velocity: vec![D::Point::ZERO; D::NUM],
                divergence_v: 0.0,
                curl_v_magnitude: 0.0,
            })
            .collect();
        Self {
            real,
            params,
            ghosts,
            tree_config: TreeConfig::default(),
            time: 0.0,
            step_count: 0,
            next_particle_output_time: 0.0,
            next_energy_output_time: 0.0,
            initial_output_emitted: false,
            gradients,
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn particles(&self) -> &[Particle<D>] {
        &self.real
    }

    fn max_support_radius(&self) -> f64 {
        let support_in_h = match self.params.kernel {
            KernelKind::CubicSpline => CubicSpline::support_radius_in_h(),
            KernelKind::WendlandC4 => WendlandC4::support_radius_in_h(),
        };
        let max_h = self
            .real
            .iter()
            .map(|p| p.smoothing_length)
            .fold(0.0, f64::max);
        support_in_h * max_h.max(1e-6)
    }

    /// Run one predictor-corrector step, writing output through `sink` on
    /// cadence and reporting non-fatal conditions through `log`.
    pub fn step(
        &mut self,
        sink: &mut impl OutputSink<D>,
        log: &mut impl SphLog,
    ) -> Result<(), SphError> {
        if !self.initial_output_emitted {
            sink.write_particles(self.time, self.step_count, &self.real);
            let (kinetic, thermal, potential) = self.energies();
            sink.write_energy(self.time, kinetic, thermal, potential, kinetic + thermal + potential);
            self.initial_output_emitted = true;
        }

        let deriv0 = self.evaluate_derivatives(log)?;
        let viscosity_beta = match &self.params.formulation {
            FormulationParams::Ssph { artificial_viscosity } => artificial_viscosity.beta,
            FormulationParams::Disph { artificial_viscosity } => artificial_viscosity.beta,
            FormulationParams::Gsph => 0.0,
        };
        let mut dt = timestep::compute_timestep(&self.real, &self.params.timestep, viscosity_beta);

        // Never step past the next scheduled output time (spec §4.8/S6):
        // an interval of 0 means that cadence is disabled (every step
        // emits), so only a positive interval imposes a clamp.
        if self.params.particle_output_interval > 0.0 {
            let remaining = self.next_particle_output_time - self.time;
            if remaining > 0.0 && remaining < dt {
                dt = remaining;
            }
        }
        if self.params.energy_output_interval > 0.0 {
            let remaining = self.next_energy_output_time - self.time;
            if remaining > 0.0 && remaining < dt {
                dt = remaining;
            }
        }

        let old_velocity: Vec<D::Point> = self.real.iter().map(|p| p.velocity).collect();
        let old_energy: Vec<f64> = self.real.iter().map(|p| p.energy).collect();

        for (i, p) in self.real.iter_mut().enumerate() {
            p.position = p.position
                + p.velocity * dt
                + deriv0[i].acceleration * (0.5 * dt * dt);
            p.velocity = p.velocity + deriv0[i].acceleration * dt;
            p.energy = (p.energy + deriv0[i].denergy_dt * dt).max(1e-12);
            p.acceleration = deriv0[i].acceleration;
        }

        let deriv1 = self.evaluate_derivatives(log)?;

        for (i, p) in self.real.iter_mut().enumerate() {
            p.velocity = old_velocity[i] + (deriv0[i].acceleration + deriv1[i].acceleration) * (0.5 * dt);
            p.energy = (old_energy[i] + (deriv0[i].denergy_dt + deriv1[i].denergy_dt) * (0.5 * dt)).max(1e-12);
            p.acceleration = deriv1[i].acceleration;
        }

        self.time += dt;
        self.step_count += 1;

        if self.params.particle_output_interval > 0.0 {
            if self.time + OUTPUT_TIME_EPSILON >= self.next_particle_output_time {
                sink.write_particles(self.time, self.step_count, &self.real);
                self.next_particle_output_time += self.params.particle_output_interval;
            }
        } else {
            sink.write_particles(self.time, self.step_count, &self.real);
        }

        if self.params.energy_output_interval > 0.0 {
            if self.time + OUTPUT_TIME_EPSILON >= self.next_energy_output_time {
                let (kinetic, thermal, potential) = self.energies();
                sink.write_energy(self.time, kinetic, thermal, potential, kinetic + thermal + potential);
                self.next_energy_output_time += self.params.energy_output_interval;
            }
        } else {
            let (kinetic, thermal, potential) = self.energies();
            sink.write_energy(self.time, kinetic, thermal, potential, kinetic + thermal + potential);
        }

        Ok(())
    }

    pub fn run(
        &mut self,
        t_end: f64,
        sink: &mut impl OutputSink<D>,
        log: &mut impl SphLog,
    ) -> Result<(), SphError> {
        while self.time < t_end {
            self.step(sink, log)?;
        }
        Ok(())
    }

    fn energies(&self) -> (f64, f64, f64) {
        let kinetic: f64 = self
            .real
            .iter()
            .map(|p| 0.5 * p.mass * p.velocity.length_squared())
            .sum();
        let thermal: f64 = self.real.iter().map(|p| p.mass * p.energy).sum();
        let potential: f64 = self
            .real
            .iter()
            .map(|p| 0.5 * p.mass * p.gravitational_potential)
            .sum();
        (kinetic, thermal, potential)
    }

    /// Run the full ghost/tree/smoothing/force pipeline against the
    /// current `self.real` state (mutating density, pressure, h and
    /// related per-particle fields in place) and return the acceleration
    /// and energy-rate derivatives the integrator needs.
    fn evaluate_derivatives(&mut self, log: &mut impl SphLog) -> Result<Vec<Derivative<D>>, SphError> {
        self.ghosts.wrap_periodic(&mut self.real);

        let support_radius = self.max_support_radius();
        if self.ghosts.needs_regenerate(&self.real, support_radius) {
            self.ghosts.regenerate(&self.real, support_radius);
        } else {
            self.ghosts.update(&self.real);
        }
        let search = self.ghosts.build_search_particles(&self.real);

        let extent = Extent::from_positions(search.as_slice().iter().map(|p| p.position))
            .unwrap_or_else(|| self.params.boundary.as_extent())
            .pad(0.01);

        let points: Vec<_> = search
            .indices()
            .map(|idx| TreePoint {
                index: idx,
                position: search[idx].position,
                mass: search[idx].mass,
            })
            .collect();
        let tree: BhTree<D, NeighborIndex> = BhTree::build(points, extent, self.tree_config);

        match self.params.kernel {
            KernelKind::CubicSpline => self.smoothing_and_gradients::<CubicSpline>(&search, &tree, log)?,
            KernelKind::WendlandC4 => self.smoothing_and_gradients::<WendlandC4>(&search, &tree, log)?,
        };

        let search = self.ghosts.build_search_particles(&self.real);

        let derivatives = match self.params.kernel {
            KernelKind::CubicSpline => self.compute_forces::<CubicSpline>(&search),
            KernelKind::WendlandC4 => self.compute_forces::<WendlandC4>(&search),
        };

        if let Some(gravity_params) = self.params.gravity {
            let real_extent = Extent::from_positions(self.real.iter().map(|p| p.position))
                .unwrap_or_else(|| self.params.boundary.as_extent())
                .pad(0.01);
            let gtree = gravity::build_gravity_tree(&self.real, real_extent, self.tree_config);
            let positions: Vec<D::Point> = self.real.iter().map(|p| p.position).collect();
            let results: Vec<_> = (0..self.real.len())
                .into_par_iter()
                .map(|i| gravity::acceleration_on(&gtree, i, positions[i], &gravity_params))
                .collect();
            let mut derivatives = derivatives;
            for (i, r) in results.into_iter().enumerate() {
                derivatives[i].acceleration = derivatives[i].acceleration + r.acceleration;
                self.real[i].gravitational_potential = r.potential;
            }
            return Ok(derivatives);
        }

        Ok(derivatives)
    }

    fn smoothing_and_gradients<K: Kernel>(
        &mut self,
        search: &SearchParticles<D>,
        tree: &BhTree<D, NeighborIndex>,
        log: &mut impl SphLog,
    ) -> Result<(), SphError> {
        let gamma = self.params.gamma;
        let smoothing_params = self.params.smoothing;
        let real_count = self.real.len();

        // First pass is sequential (per-particle Newton solve is cheap and
        // reads/writes disjoint `self.real` entries; kept sequential here
        // to keep the borrow of `search`/`tree` simple rather than
        // threading results through a parallel collector).
        let mut results = Vec::with_capacity(real_count);
        for i in 0..real_count {
            let position = self.real[i].position;
            let mass = self.real[i].mass;
            let guess_h = self.real[i].smoothing_length.max(1e-3);
            let result = smoothing::solve_smoothing_length::<D, K>(
                position,
                mass,
                guess_h,
                search,
                tree,
                &smoothing_params,
            )?;
            if result.truncated {
                log.report(NonFatalReport {
                    step: self.step_count,
                    time: self.time,
                    error: SphError::NeighborTruncation {
                        particle_id: self.real[i].id,
                        capacity: result.neighbors.len(),
                    },
                });
            }
            results.push(result);
        }

        for (i, result) in results.iter().enumerate() {
            let p = &mut self.real[i];
            p.smoothing_length = result.smoothing_length;
            p.density = result.density;
            p.grad_h = result.grad_h;
            p.pressure = (gamma - 1.0) * p.density * p.energy;
            p.sound_speed = smoothing::sound_speed(gamma, p.pressure, p.density);
            // Only real neighbors count toward the reported neighbor
            // count (the convergence target), even though ghosts
            // contributed to the density/gradient sums above.
            p.neighbor_count = result
                .neighbors
                .iter()
                .filter(|&&(idx, _)| idx.get() < search.real_count())
                .count();
        }

        for i in 0..real_count {
            let p = &self.real[i];
            let gradients = smoothing::compute_gradients::<D, K>(
                p.position,
                p.smoothing_length,
                p.density,
                p.pressure,
                p.velocity,
                search,
                &results[i].neighbors,
            );
            let balsara = smoothing::balsara_switch(
                gradients.divergence_v,
                gradients.curl_v_magnitude,
                p.sound_speed,
                p.smoothing_length,
            );
            let (alpha_min, alpha_max) = self.params.alpha_viscosity_bounds;
            let dalpha_dt = sph::alpha_rate_of_change(
                p.alpha,
                alpha_min,
                alpha_max,
                gradients.divergence_v,
                p.sound_speed,
                p.smoothing_length,
                self.params.viscosity_decay_time_constant,
            );
            let p = &mut self.real[i];
            p.balsara = balsara;
            p.alpha = (p.alpha + dalpha_dt * 1e-3).clamp(alpha_min, alpha_max);
            p.velocity_divergence = gradients.divergence_v;
            self.gradients[i] = gradients;
        }

        Ok(())
    }

    fn compute_forces<K: Kernel>(&self, search: &SearchParticles<D>) -> Vec<Derivative<D>> {
        let gamma = self.params.gamma;
        let real = &self.real;
        let formulation = self.params.formulation;
        let tree_config = self.tree_config;

        // Rebuild the neighbor list per particle against the *final*
        // smoothing length from the pass above; cheap relative to the
        // Newton solve since it is a single query, no iteration.
        let extent = Extent::from_positions(search.as_slice().iter().map(|p| p.position))
            .unwrap_or_else(|| self.params.boundary.as_extent())
            .pad(0.01);
        let points: Vec<_> = search
            .indices()
            .map(|idx| TreePoint {
                index: idx,
                position: search[idx].position,
                mass: search[idx].mass,
            })
            .collect();
        let tree: BhTree<D, NeighborIndex> = BhTree::build(points, extent, tree_config);

        (0..real.len())
            .into_par_iter()
            .map(|i| {
                let p = &real[i];
                let support = K::support_radius_in_h() * p.smoothing_length;
                let mut collector = crate::tree::collector::Collector::with_capacity(
                    (self.params.smoothing.target_neighbors * self.params.smoothing.neighbor_capacity_factor)
                        .ceil() as usize,
                );
                crate::tree::query::radius_search(&tree, p.position, support, &mut collector);

                let mut total = PairContribution::<D>::zero();
                for (idx, r2) in collector.iter() {
                    let r = r2.sqrt();
                    if r <= 0.0 {
                        continue;
                    }
                    let other = &search[idx];
                    let contribution = match formulation {
                        FormulationParams::Ssph { artificial_viscosity } => {
                            ssph::pair_contribution::<D, K>(
                                &ssph::ParticleState {
                                    position: p.position,
                                    velocity: p.velocity,
                                    mass: p.mass,
                                    density: p.density,
                                    pressure: p.pressure,
                                    energy: p.energy,
                                    smoothing_length: p.smoothing_length,
                                    sound_speed: p.sound_speed,
                                    grad_h: p.grad_h,
                                    balsara: p.balsara,
                                },
                                &ssph::ParticleState {
                                    position: other.position,
                                    velocity: other.velocity,
                                    mass: other.mass,
                                    density: other.density,
                                    pressure: other.pressure,
                                    energy: other.energy,
                                    smoothing_length: other.smoothing_length,
                                    sound_speed: other.sound_speed,
                                    grad_h: other.grad_h,
                                    balsara: other.balsara,
                                },
                                &artificial_viscosity,
                            )
                        }
                        FormulationParams::Disph { artificial_viscosity } => {
                            disph::pair_contribution::<D, K>(
                                &disph::ParticleState {
                                    position: p.position,
                                    velocity: p.velocity,
                                    mass: p.mass,
                                    energy: p.energy,
                                    pressure: p.pressure,
                                    smoothing_length: p.smoothing_length,
                                    sound_speed: p.sound_speed,
                                    density: p.density,
                                    balsara: p.balsara,
                                    y_grad_h: p.grad_h,
                                },
                                &disph::ParticleState {
                                    position: other.position,
                                    velocity: other.velocity,
                                    mass: other.mass,
                                    energy: other.energy,
                                    pressure: other.pressure,
                                    smoothing_length: other.smoothing_length,
                                    sound_speed: other.sound_speed,
                                    density: other.density,
                                    balsara: other.balsara,
                                    y_grad_h: other.grad_h,
                                },
                                gamma,
                                &artificial_viscosity,
                            )
                        }
                        FormulationParams::Gsph => gsph::pair_contribution::<D, K>(
                            &gsph::ParticleState {
                                position: p.position,
                                velocity: p.velocity,
                                mass: p.mass,
                                density: p.density,
                                pressure: p.pressure,
                                smoothing_length: p.smoothing_length,
                                density_gradient: self.gradients[i].density,
                                pressure_gradient: self.gradients[i].pressure,
                                // Reconstructing the velocity field to
                                // second order would need the normal
                                // projection of the full velocity
                                // gradient tensor at MUSCL time; left at
                                // first order (zero gradient) here.
                                velocity_gradient_normal: D::Point::ZERO,
                            },
                            &gsph::ParticleState {
                                position: other.position,
                                velocity: other.velocity,
                                mass: other.mass,
                                density: other.density,
                                pressure: other.pressure,
                                smoothing_length: other.smoothing_length,
                                density_gradient: D::Point::ZERO,
                                pressure_gradient: D::Point::ZERO,
                                velocity_gradient_normal: D::Point::ZERO,
                            },
                            gamma,
                        ),
                    };
                    total.acceleration = total.acceleration + contribution.acceleration;
                    total.denergy_dt += contribution.denergy_dt;
                }

                Derivative {
                    acceleration: total.acceleration,
                    denergy_dt: total.denergy_dt,
                }
            })
            .collect()
    }
}
