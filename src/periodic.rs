//! Minimum-image offsets under a (possibly per-axis) periodic boundary.

use crate::boundary::BoundaryConfig;
use crate::dimension::Dimension;
use crate::dimension::Vector;

/// The displacement `a - b` under the minimum-image convention: for every
/// periodic axis, the component is wrapped into `(-length/2, length/2]`
/// before the offset is formed, so pairs that are close across a periodic
/// seam are not mistaken for being far apart.
pub fn minimum_image_offset<D: Dimension>(
    a: D::Point,
    b: D::Point,
    boundary: &BoundaryConfig<D>,
) -> D::Point {
    (0..D::NUM).fold(D::Point::ZERO, |acc, axis| {
        let mut d = a.component(axis) - b.component(axis);
        if boundary.is_periodic(axis) {
            let length = boundary.axes[axis].length();
            d -= length * (d / length).round();
        }
        acc + D::Point::on_axis(axis, d)
    })
}

pub fn minimum_image_distance<D: Dimension>(
    a: D::Point,
    b: D::Point,
    boundary: &BoundaryConfig<D>,
) -> f64 {
    minimum_image_offset::<D>(a, b, boundary).length()
}
