//! Ghost-particle generation for the boundary model: periodic wraps and
//! Morris (1997) mirror walls.
//!
//! Ghosts are kept in a separate buffer from the real particles (spec
//! §3/§9's two-array discipline) and are regenerated wholesale whenever a
//! real particle crosses close enough to a boundary that its existing
//! ghost set might be stale, rather than being incrementally patched —
//! simpler, and cheap relative to one neighbor-search pass.

use crate::boundary::BoundaryConfig;
use crate::boundary::BoundaryKind;
use crate::boundary::MirrorKind;
use crate::dimension::Dimension;
use crate::dimension::Vector;
use crate::particle::GhostTransform;
use crate::particle::Particle;
use crate::particle::ParticleKind;
use crate::particle::SearchParticles;

/// Apply a set of per-axis mirror reflections to a position/velocity pair.
/// If any reflected axis is a no-slip wall, the whole velocity vector is
/// reversed (no-slip enforces zero velocity at the wall, tangential
/// included); otherwise only the normal component of each free-slip axis
/// is reversed. Shared by ghost generation and resync so both agree
/// bit-for-bit (spec P7).
fn reflect<D: Dimension>(
    position: D::Point,
    velocity: D::Point,
    reflections: &[Option<(f64, bool)>; 3],
) -> (D::Point, D::Point) {
    let mut out_position = position;
    let has_no_slip = reflections[..D::NUM].iter().any(|r| matches!(r, Some((_, true))));
    for axis in 0..D::NUM {
        if let Some((plane, _)) = reflections[axis] {
            let c = out_position.component(axis);
            out_position = out_position + D::Point::on_axis(axis, 2.0 * plane - c - c);
        }
    }
    let out_velocity = if has_no_slip {
        -velocity
    } else {
        let mut v = velocity;
        for axis in 0..D::NUM {
            if reflections[axis].is_some() {
                let c = v.component(axis);
                v = v + D::Point::on_axis(axis, -2.0 * c);
            }
        }
        v
    };
    (out_position, out_velocity)
}

/// Generates and refreshes the ghost layer for one boundary configuration.
pub struct GhostManager<D: Dimension> {
    boundary: BoundaryConfig<D>,
    /// Ghosts are only regenerated once a real particle has moved within
    /// `proximity_factor * support_radius` of a wall; this is the epsilon
    /// margin added on top to avoid regenerating every single step from
    /// float jitter at the threshold.
    proximity_margin: f64,
    ghosts: Vec<Particle<D>>,
    /// Position of every real particle at the time `ghosts` was last built,
    /// used to decide whether a regeneration is needed.
    last_build_positions: Vec<D::Point>,
}

impl<D: Dimension> GhostManager<D> {
    pub fn new(boundary: BoundaryConfig<D>) -> Self {
        Self {
            boundary,
            proximity_margin: 1e-6,
            ghosts: Vec::new(),
            last_build_positions: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &BoundaryConfig<D> {
        &self.boundary
    }

    /// Whether any real particle has moved close enough to a wall, or the
    /// ghost set has never been built, that a full regeneration is needed.
    pub fn needs_regenerate(&self, real: &[Particle<D>], support_radius: f64) -> bool {
        if self.last_build_positions.len() != real.len() {
            return true;
        }
        real.iter().enumerate().any(|(i, p)| {
            self.distance_to_nearest_active_wall(p.position) <= support_radius + self.proximity_margin
                || p.position.distance(self.last_build_positions[i]) > self.proximity_margin
        })
    }

    fn distance_to_nearest_active_wall(&self, position: D::Point) -> f64 {
        (0..D::NUM)
            .flat_map(|axis| {
                let ab = &self.boundary.axes[axis];
                let c = position.component(axis);
                let lower = match ab.lower_kind {
                    BoundaryKind::Open => f64::INFINITY,
                    _ => c - ab.lower,
                };
                let upper = match ab.upper_kind {
                    BoundaryKind::Open => f64::INFINITY,
                    _ => ab.upper - c,
                };
                [lower, upper]
            })
            .fold(f64::INFINITY, f64::min)
    }

    /// Rebuild the ghost layer from scratch against the current real
    /// particle positions. `support_radius` is the largest kernel support
    /// radius (`kernel_radius_in_h * h_max`) of any real particle: only
    /// particles within that distance of a wall can possibly need a ghost.
    pub fn regenerate(&mut self, real: &[Particle<D>], support_radius: f64) {
        self.ghosts.clear();
        self.last_build_positions.clear();
        self.last_build_positions
            .extend(real.iter().map(|p| p.position));

        for (source, p) in real.iter().enumerate() {
            self.push_periodic_ghosts(source, p, support_radius);
            self.push_mirror_ghosts(source, p, support_radius);
        }
    }

    /// Enumerate all `3^D - 1` periodic translations (skipping the
    /// zero-offset identity) whose translated position lands within
    /// `support_radius` of the real domain, covering both edge and corner
    /// ghosts in one pass.
    fn push_periodic_ghosts(&mut self, source: usize, p: &Particle<D>, support_radius: f64) {
        let periodic_axes: Vec<usize> = (0..D::NUM).filter(|&a| self.boundary.is_periodic(a)).collect();
        if periodic_axes.is_empty() {
            return;
        }
        let choices = [-1i32, 0, 1];
        let num_combinations = choices.len().pow(periodic_axes.len() as u32);
        for combo in 0..num_combinations {
            let mut rem = combo;
            let mut offset = D::Point::ZERO;
            let mut any_nonzero = false;
            for &axis in &periodic_axes {
                let choice = choices[rem % choices.len()];
                rem /= choices.len();
                if choice != 0 {
                    any_nonzero = true;
                    let length = self.boundary.axes[axis].length();
                    offset = offset + D::Point::on_axis(axis, choice as f64 * length);
                }
            }
            if !any_nonzero {
                continue;
            }
            let translated = p.position + offset;
            if self.within_support_of_domain(translated, support_radius) {
                self.ghosts.push(Particle {
                    id: p.id,
                    kind: ParticleKind::Ghost {
                        source,
                        transform: GhostTransform::Periodic { offset },
                    },
                    position: translated,
                    ..*p
                });
            }
        }
    }

    fn within_support_of_domain(&self, position: D::Point, support_radius: f64) -> bool {
        (0..D::NUM).all(|axis| {
            let ab = &self.boundary.axes[axis];
            let c = position.component(axis);
            c >= ab.lower - support_radius && c <= ab.upper + support_radius
        })
    }

    /// Mirror ghosts, one per active wall the particle is within
    /// `support_radius` of, including the combinations needed at corners
    /// where two walls are both close (each axis contributes its own
    /// independent reflection, composed).
    fn push_mirror_ghosts(&mut self, source: usize, p: &Particle<D>, support_radius: f64) {
        // Collect, per axis, the list of (plane, no_slip) reflections that
        // apply, then take the cartesian product across axes (including
        // "no reflection on this axis") to cover corner ghosts, skipping
        // the all-none combination (which is just the real particle). The
        // wall plane sits half a particle spacing outside the domain range
        // (spec §4.4 Morris 1997), not at the range boundary itself.
        let mut per_axis_options: Vec<Vec<Option<(f64, bool)>>> = Vec::with_capacity(D::NUM);
        for axis in 0..D::NUM {
            let ab = &self.boundary.axes[axis];
            let c = p.position.component(axis);
            let mut options = vec![None];
            if let BoundaryKind::Mirror(kind) = ab.lower_kind {
                let wall = ab.lower_wall();
                if c - wall <= support_radius {
                    options.push(Some((wall, kind == MirrorKind::NoSlip)));
                }
            }
            if let BoundaryKind::Mirror(kind) = ab.upper_kind {
                let wall = ab.upper_wall();
                if wall - c <= support_radius {
                    options.push(Some((wall, kind == MirrorKind::NoSlip)));
                }
            }
            per_axis_options.push(options);
        }

        let num_combinations: usize = per_axis_options.iter().map(Vec::len).product();
        for combo in 0..num_combinations {
            let mut rem = combo;
            let mut reflections = [None; 3];
            let mut any = false;
            for (axis, options) in per_axis_options.iter().enumerate() {
                let choice = options[rem % options.len()];
                rem /= options.len();
                if choice.is_some() {
                    any = true;
                    reflections[axis] = choice;
                }
            }
            if !any {
                continue;
            }
            let (position, velocity) = reflect::<D>(p.position, p.velocity, &reflections);
            self.ghosts.push(Particle {
                id: p.id,
                kind: ParticleKind::Ghost {
                    source,
                    transform: GhostTransform::Mirror { reflections },
                },
                position,
                velocity,
                ..*p
            });
        }
    }

    /// Refresh ghost positions/velocities in place from their sources
    /// without changing which ghosts exist, for steps where
    /// [`GhostManager::needs_regenerate`] is false.
    pub fn update(&mut self, real: &[Particle<D>]) {
        for ghost in &mut self.ghosts {
            let (source, transform) = match ghost.kind {
                ParticleKind::Ghost { source, transform } => (source, transform),
                ParticleKind::Real => unreachable!("ghost buffer must only contain ghosts"),
            };
            let src = &real[source];
            match transform {
                GhostTransform::Periodic { offset } => {
                    ghost.position = src.position + offset;
                    ghost.velocity = src.velocity;
                }
                GhostTransform::Mirror { reflections } => {
                    let (position, velocity) = reflect::<D>(src.position, src.velocity, &reflections);
                    ghost.position = position;
                    ghost.velocity = velocity;
                }
            }
            ghost.mass = src.mass;
            ghost.density = src.density;
            ghost.pressure = src.pressure;
            ghost.energy = src.energy;
            ghost.smoothing_length = src.smoothing_length;
            ghost.sound_speed = src.sound_speed;
            ghost.grad_h = src.grad_h;
            ghost.balsara = src.balsara;
            ghost.alpha = src.alpha;
        }
    }

    /// Wrap every real particle's position back into the primary periodic
    /// cell. Must run before ghost regeneration each step, per spec §4.4.
    pub fn wrap_periodic(&self, real: &mut [Particle<D>]) {
        for p in real.iter_mut() {
            for axis in 0..D::NUM {
                if !self.boundary.is_periodic(axis) {
                    continue;
                }
                let ab = &self.boundary.axes[axis];
                let length = ab.length();
                let mut c = p.position.component(axis);
                while c < ab.lower {
                    c += length;
                }
                while c >= ab.upper {
                    c -= length;
                }
                let delta = c - p.position.component(axis);
                if delta != 0.0 {
                    p.position = p.position + D::Point::on_axis(axis, delta);
                }
            }
        }
    }

    pub fn build_search_particles(&self, real: &[Particle<D>]) -> SearchParticles<D> {
        SearchParticles::new(real, self.ghosts.clone())
    }

    pub fn ghost_count(&self) -> usize {
        self.ghosts.len()
    }
}
