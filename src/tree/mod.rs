//! The Barnes-Hut spatial tree shared by neighbor search and gravity.
//!
//! The tree is generic over the index type `I` stored at the leaves so the
//! same implementation serves both the neighbor-search universe (indexed
//! by [`crate::particle::NeighborIndex`]) and the gravity tree (indexed by
//! plain `usize` into the real-particle array, per the open-question
//! decision in `DESIGN.md` to exclude ghosts from gravity).
//!
//! Nodes live in a flat arena (`Vec<NodeEntry>`) rather than as
//! `Box`-allocated children, so the tree can be rebuilt into the same
//! backing storage every step instead of reallocating (spec §5's resource
//! policy).

pub mod collector;
pub mod query;

use crate::dimension::Dimension;
use crate::dimension::Vector;
use crate::extent::Extent;

/// One point to be inserted into the tree: an opaque index, its position,
/// and its mass (used for the gravity multipole; ignored by neighbor
/// search callers, who pass `1.0`).
#[derive(Debug, Clone, Copy)]
pub struct TreePoint<D: Dimension, I> {
    pub index: I,
    pub position: D::Point,
    pub mass: f64,
}

#[derive(Debug, Clone)]
pub struct LeafData<D: Dimension, I> {
    pub points: Vec<TreePoint<D, I>>,
}

#[derive(Debug, Clone)]
pub enum NodeKind<D: Dimension, I> {
    Leaf(LeafData<D, I>),
    Internal { children: Vec<usize> },
}

/// Aggregate (monopole) data used by the gravity walk's opening-angle test.
#[derive(Debug, Clone, Copy)]
pub struct NodeData<D: Dimension> {
    pub total_mass: f64,
    pub center_of_mass: D::Point,
}

impl<D: Dimension> NodeData<D> {
    fn empty() -> Self {
        Self {
            total_mass: 0.0,
            center_of_mass: D::Point::ZERO,
        }
    }

    fn combine(entries: impl Iterator<Item = Self>) -> Self {
        let mut total_mass = 0.0;
        let mut weighted = D::Point::ZERO;
        for e in entries {
            total_mass += e.total_mass;
            weighted = weighted + e.center_of_mass * e.total_mass;
        }
        if total_mass > 0.0 {
            Self {
                total_mass,
                center_of_mass: weighted * (1.0 / total_mass),
            }
        } else {
            Self::empty()
        }
    }

    fn from_points<I>(points: &[TreePoint<D, I>]) -> Self {
        let total_mass: f64 = points.iter().map(|p| p.mass).sum();
        if total_mass <= 0.0 {
            return Self::empty();
        }
        let weighted = points
            .iter()
            .fold(D::Point::ZERO, |acc, p| acc + p.position * p.mass);
        Self {
            total_mass,
            center_of_mass: weighted * (1.0 / total_mass),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NodeEntry<D: Dimension, I> {
    pub extent: Extent<D>,
    pub kind: NodeKind<D, I>,
    pub data: NodeData<D>,
}

/// Construction parameters: when to stop subdividing a node.
#[derive(Debug, Clone, Copy)]
pub struct TreeConfig {
    pub max_leaf_size: usize,
    pub max_depth: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_leaf_size: 8,
            max_depth: 48,
        }
    }
}

/// A Barnes-Hut tree over a fixed set of points, rebuilt each step.
pub struct BhTree<D: Dimension, I: Copy> {
    pub(crate) arena: Vec<NodeEntry<D, I>>,
    pub(crate) root: usize,
    config: TreeConfig,
}

impl<D: Dimension, I: Copy> BhTree<D, I> {
    pub fn build(points: Vec<TreePoint<D, I>>, extent: Extent<D>, config: TreeConfig) -> Self {
        let mut arena = Vec::new();
        let root = if points.is_empty() {
            arena.push(NodeEntry {
                extent,
                kind: NodeKind::Leaf(LeafData { points }),
                data: NodeData::empty(),
            });
            0
        } else {
            Self::build_node(&mut arena, points, extent, &config, 0)
        };
        Self {
            arena,
            root,
            config,
        }
    }

    fn build_node(
        arena: &mut Vec<NodeEntry<D, I>>,
        points: Vec<TreePoint<D, I>>,
        extent: Extent<D>,
        config: &TreeConfig,
        depth: usize,
    ) -> usize {
        if points.len() <= config.max_leaf_size || depth >= config.max_depth {
            let data = NodeData::from_points(&points);
            let idx = arena.len();
            arena.push(NodeEntry {
                extent,
                kind: NodeKind::Leaf(LeafData { points }),
                data,
            });
            return idx;
        }

        let quadrants = extent.quadrants();
        let mut buckets: Vec<Vec<TreePoint<D, I>>> = vec![Vec::new(); D::NUM_CHILDREN];
        for p in points {
            let q = extent.quadrant_index(p.position);
            buckets[q].push(p);
        }

        // If every point landed in the same bucket (coincident points, or
        // a degenerate extent), splitting further would recurse forever;
        // fall back to a leaf instead, matching the teacher's own
        // coincident-particle safeguard.
        if buckets.iter().filter(|b| !b.is_empty()).count() <= 1 {
            let all_points: Vec<_> = buckets.into_iter().flatten().collect();
            let data = NodeData::from_points(&all_points);
            let idx = arena.len();
            arena.push(NodeEntry {
                extent,
                kind: NodeKind::Leaf(LeafData { points: all_points }),
                data,
            });
            return idx;
        }

        let mut children = Vec::with_capacity(D::NUM_CHILDREN);
        for (bucket, sub_extent) in buckets.into_iter().zip(quadrants) {
            children.push(Self::build_node(arena, bucket, sub_extent, config, depth + 1));
        }
        let data = NodeData::combine(children.iter().map(|&c| arena[c].data));
        let idx = arena.len();
        arena.push(NodeEntry {
            extent,
            kind: NodeKind::Internal { children },
            data,
        });
        idx
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn node(&self, index: usize) -> &NodeEntry<D, I> {
        &self.arena[index]
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty() || matches!(&self.arena[self.root].kind, NodeKind::Leaf(l) if l.points.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::TwoD;
    use glam::DVec2;

    fn extent() -> Extent<TwoD> {
        Extent::new(DVec2::new(0.0, 0.0), DVec2::new(10.0, 10.0))
    }

    #[test]
    fn build_with_few_points_is_single_leaf() {
        let points = vec![
            TreePoint { index: 0usize, position: DVec2::new(1.0, 1.0), mass: 1.0 },
            TreePoint { index: 1usize, position: DVec2::new(9.0, 9.0), mass: 1.0 },
        ];
        let tree = BhTree::build(points, extent(), TreeConfig::default());
        assert!(matches!(tree.node(tree.root()).kind, NodeKind::Leaf(_)));
    }

    #[test]
    fn build_subdivides_when_over_capacity() {
        let points: Vec<_> = (0..100)
            .map(|i| TreePoint {
                index: i,
                position: DVec2::new((i % 10) as f64, (i / 10) as f64),
                mass: 1.0,
            })
            .collect();
        let config = TreeConfig { max_leaf_size: 4, max_depth: 48 };
        let tree = BhTree::build(points, extent(), config);
        assert!(matches!(tree.node(tree.root()).kind, NodeKind::Internal { .. }));
        let total_mass = tree.node(tree.root()).data.total_mass;
        assert!((total_mass - 100.0).abs() < 1e-9);
    }

    #[test]
    fn coincident_points_do_not_infinite_recurse() {
        let points: Vec<_> = (0..20)
            .map(|i| TreePoint {
                index: i,
                position: DVec2::new(5.0, 5.0),
                mass: 1.0,
            })
            .collect();
        let config = TreeConfig { max_leaf_size: 4, max_depth: 10 };
        let tree = BhTree::build(points, extent(), config);
        assert!(tree.len() >= 1);
    }

    #[test]
    fn empty_tree_has_zero_mass() {
        let tree: BhTree<TwoD, usize> = BhTree::build(Vec::new(), extent(), TreeConfig::default());
        assert!(tree.is_empty());
        assert_eq!(tree.node(tree.root()).data.total_mass, 0.0);
    }
}
