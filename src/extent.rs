//! Axis-aligned bounding box, generic over [`Dimension`].

use crate::dimension::Dimension;
use crate::dimension::Vector;

/// An axis-aligned bounding box in `D` dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent<D: Dimension> {
    pub min: D::Point,
    pub max: D::Point,
    pub center: D::Point,
}

impl<D: Dimension> Extent<D> {
    pub fn new(min: D::Point, max: D::Point) -> Self {
        let center = (min + max) * 0.5;
        Self { min, max, center }
    }

    pub fn side_length(&self, axis: usize) -> f64 {
        self.max.component(axis) - self.min.component(axis)
    }

    pub fn max_side_length(&self) -> f64 {
        (0..D::NUM)
            .map(|axis| self.side_length(axis))
            .fold(0.0, f64::max)
    }

    /// Smallest extent containing every point of `positions`. `None` if
    /// `positions` is empty.
    pub fn from_positions(positions: impl Iterator<Item = D::Point>) -> Option<Self> {
        let mut iter = positions.peekable();
        let first = *iter.peek()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| {
            (min.min_component_wise(p), max.max_component_wise(p))
        });
        Some(Self::new(min, max))
    }

    /// Pad the extent by `relative_padding` of its largest side length on
    /// every side, so that points exactly on the boundary of the original
    /// data never sit exactly on the tree's root boundary.
    pub fn pad(&self, relative_padding: f64) -> Self {
        let pad = self.max_side_length() * relative_padding;
        let pad_vec = (0..D::NUM).fold(D::Point::ZERO, |acc, axis| {
            acc + D::Point::on_axis(axis, pad)
        });
        Self::new(self.min - pad_vec, self.max + pad_vec)
    }

    pub fn contains(&self, point: D::Point) -> bool {
        (0..D::NUM).all(|axis| {
            let c = point.component(axis);
            c >= self.min.component(axis) && c <= self.max.component(axis)
        })
    }

    /// Index of the `2^D` quadrant/octant `point` falls in: bit `axis` is
    /// set if `point` lies in the upper half of that axis.
    pub fn quadrant_index(&self, point: D::Point) -> usize {
        (0..D::NUM).fold(0, |acc, axis| {
            if point.component(axis) >= self.center.component(axis) {
                acc | (1 << axis)
            } else {
                acc
            }
        })
    }

    /// The `2^D` sub-extents obtained by bisecting every axis at the
    /// center, ordered so that index `i` matches [`Extent::quadrant_index`].
    pub fn quadrants(&self) -> Vec<Self> {
        (0..D::NUM_CHILDREN)
            .map(|i| {
                let mut min = D::Point::ZERO;
                let mut max = D::Point::ZERO;
                for axis in 0..D::NUM {
                    let upper = (i >> axis) & 1 == 1;
                    let (lo, hi) = if upper {
                        (self.center.component(axis), self.max.component(axis))
                    } else {
                        (self.min.component(axis), self.center.component(axis))
                    };
                    min = min + D::Point::on_axis(axis, lo);
                    max = max + D::Point::on_axis(axis, hi);
                }
                Self::new(min, max)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::OneD;
    use crate::dimension::ThreeD;
    use crate::dimension::TwoD;
    use glam::DVec2;
    use glam::DVec3;

    #[test]
    fn quadrants_2d() {
        let extent = Extent::<TwoD>::new(DVec2::new(0.0, 0.0), DVec2::new(2.0, 2.0));
        let quads = extent.quadrants();
        assert_eq!(quads.len(), 4);
        assert_eq!(extent.quadrant_index(DVec2::new(0.5, 0.5)), 0);
        assert_eq!(extent.quadrant_index(DVec2::new(1.5, 0.5)), 1);
        assert_eq!(extent.quadrant_index(DVec2::new(0.5, 1.5)), 2);
        assert_eq!(extent.quadrant_index(DVec2::new(1.5, 1.5)), 3);
    }

    #[test]
    fn octants_3d() {
        let extent = Extent::<ThreeD>::new(DVec3::new(0.0, 0.0, 0.0), DVec3::new(2.0, 2.0, 2.0));
        assert_eq!(extent.quadrants().len(), 8);
    }

    #[test]
    fn one_d_has_two_children() {
        let extent = Extent::<OneD>::new(0.0, 2.0);
        let quads = extent.quadrants();
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[0], Extent::new(0.0, 1.0));
        assert_eq!(quads[1], Extent::new(1.0, 2.0));
    }

    #[test]
    fn from_positions_empty_is_none() {
        assert!(Extent::<TwoD>::from_positions(std::iter::empty()).is_none());
    }

    #[test]
    fn pad_grows_every_side() {
        let extent = Extent::<TwoD>::new(DVec2::new(0.0, 0.0), DVec2::new(2.0, 2.0));
        let padded = extent.pad(0.1);
        assert!(padded.min.x < 0.0);
        assert!(padded.max.x > 2.0);
    }
}
