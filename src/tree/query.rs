//! Tree traversals: bounded-radius neighbor search and the Barnes-Hut
//! gravity walk.
//!
//! Periodicity is handled upstream by [`crate::ghost::GhostManager`]
//! materializing periodic images as ghost particles before the tree is
//! built, so these traversals themselves only ever need a plain
//! (non-wrapping) distance test against the tree's extents.

use crate::dimension::Dimension;
use crate::dimension::Vector;
use crate::extent::Extent;
use crate::tree::collector::Collector;
use crate::tree::BhTree;
use crate::tree::NodeKind;

/// Squared distance from `point` to the nearest point of `extent`, zero if
/// `point` is inside.
fn distance_squared_to_extent<D: Dimension>(point: D::Point, extent: &Extent<D>) -> f64 {
    (0..D::NUM)
        .map(|axis| {
            let c = point.component(axis);
            let lo = extent.min.component(axis);
            let hi = extent.max.component(axis);
            if c < lo {
                (lo - c).powi(2)
            } else if c > hi {
                (c - hi).powi(2)
            } else {
                0.0
            }
        })
        .sum()
}

/// Collect every point within `radius` of `center` into `collector`,
/// pruning subtrees whose bounding box is already farther than the
/// collector's current worst kept distance.
pub fn radius_search<D: Dimension, I: Copy>(
    tree: &BhTree<D, I>,
    center: D::Point,
    radius: f64,
    collector: &mut Collector<I>,
) {
    if tree.is_empty() {
        return;
    }
    radius_search_node(tree, tree.root(), center, radius * radius, collector);
}

fn radius_search_node<D: Dimension, I: Copy>(
    tree: &BhTree<D, I>,
    node_index: usize,
    center: D::Point,
    radius_squared: f64,
    collector: &mut Collector<I>,
) {
    let node = tree.node(node_index);
    let bound = radius_squared.min(collector.worst_distance_squared());
    if distance_squared_to_extent(center, &node.extent) > bound {
        return;
    }
    match &node.kind {
        NodeKind::Leaf(leaf) => {
            for p in &leaf.points {
                let d2 = center.distance_squared(p.position);
                if d2 <= radius_squared {
                    collector.push(p.index, d2);
                }
            }
        }
        NodeKind::Internal { children } => {
            for &child in children {
                radius_search_node(tree, child, center, radius_squared, collector);
            }
        }
    }
}

/// The result of a Barnes-Hut gravity evaluation at one point: softened
/// Newtonian acceleration and potential, with the monopole (center-of-mass)
/// approximation used for any node whose opening angle is smaller than
/// `theta`.
#[derive(Debug, Clone, Copy)]
pub struct GravityResult<D: Dimension> {
    pub acceleration: D::Point,
    pub potential: f64,
}

pub fn gravity_walk<D: Dimension, I: Copy>(
    tree: &BhTree<D, I>,
    at: D::Point,
    self_index: Option<I>,
    theta: f64,
    softening: f64,
    g: f64,
) -> GravityResult<D>
where
    I: PartialEq,
{
    if tree.is_empty() {
        return GravityResult {
            acceleration: D::Point::ZERO,
            potential: 0.0,
        };
    }
    let mut acceleration = D::Point::ZERO;
    let mut potential = 0.0;
    gravity_walk_node(
        tree,
        tree.root(),
        at,
        self_index,
        theta,
        softening,
        g,
        &mut acceleration,
        &mut potential,
    );
    GravityResult {
        acceleration,
        potential,
    }
}

#[allow(clippy::too_many_arguments)]
fn gravity_walk_node<D: Dimension, I: Copy + PartialEq>(
    tree: &BhTree<D, I>,
    node_index: usize,
    at: D::Point,
    self_index: Option<I>,
    theta: f64,
    softening: f64,
    g: f64,
    acceleration: &mut D::Point,
    potential: &mut f64,
) {
    let node = tree.node(node_index);
    if node.data.total_mass <= 0.0 {
        return;
    }
    let separation = at - node.data.center_of_mass;
    let distance = separation.length();

    match &node.kind {
        NodeKind::Leaf(leaf) => {
            for p in &leaf.points {
                if Some(p.index) == self_index {
                    continue;
                }
                accumulate_point::<D>(at, p.position, p.mass, softening, g, acceleration, potential);
            }
        }
        NodeKind::Internal { children } => {
            let node_size = node.extent.max_side_length();
            if distance > 0.0 && node_size / distance < theta {
                accumulate_point::<D>(
                    at,
                    node.data.center_of_mass,
                    node.data.total_mass,
                    softening,
                    g,
                    acceleration,
                    potential,
                );
            } else {
                for &child in children {
                    gravity_walk_node(
                        tree, child, at, self_index, theta, softening, g, acceleration, potential,
                    );
                }
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn accumulate_point<D: Dimension>(
    at: D::Point,
    source: D::Point,
    mass: f64,
    softening: f64,
    g: f64,
    acceleration: &mut D::Point,
    potential: &mut f64,
) {
    let separation = at - source;
    let distance = separation.length();
    if distance == 0.0 {
        return;
    }
    let softened = (distance.powi(2) + softening.powi(2)).sqrt();
    *acceleration = *acceleration - separation * (g * mass / softened.powi(3));
    *potential -= g * mass / softened;
}
