//! Self-gravity via the Barnes-Hut tree (spec §4.7).
//!
//! Per the open-question decision recorded in `DESIGN.md`, the gravity
//! tree is built only from real particles — ghosts are excluded from the
//! gravity sum entirely, matching the teacher's own gravity solver, which
//! has no concept of ghosts to begin with.

use crate::dimension::Dimension;
use crate::extent::Extent;
use crate::particle::Particle;
use crate::tree::query::gravity_walk;
use crate::tree::query::GravityResult;
use crate::tree::BhTree;
use crate::tree::TreeConfig;
use crate::tree::TreePoint;

#[derive(Debug, Clone, Copy)]
pub struct GravityParams {
    pub g: f64,
    pub opening_angle: f64,
    pub softening_length: f64,
}

impl Default for GravityParams {
    fn default() -> Self {
        Self {
            g: 1.0,
            opening_angle: 0.5,
            softening_length: 1e-3,
        }
    }
}

pub fn build_gravity_tree<D: Dimension>(
    real: &[Particle<D>],
    extent: Extent<D>,
    config: TreeConfig,
) -> BhTree<D, usize> {
    let points: Vec<_> = real
        .iter()
        .enumerate()
        .map(|(index, p)| TreePoint {
            index,
            position: p.position,
            mass: p.mass,
        })
        .collect();
    BhTree::build(points, extent, config)
}

pub fn acceleration_on<D: Dimension>(
    tree: &BhTree<D, usize>,
    particle_index: usize,
    position: D::Point,
    params: &GravityParams,
) -> GravityResult<D> {
    gravity_walk(
        tree,
        position,
        Some(particle_index),
        params.opening_angle,
        params.softening_length,
        params.g,
    )
}
