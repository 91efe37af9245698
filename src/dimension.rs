//! Generic spatial dimension support.
//!
//! `Dimension` is implemented by the marker types [`OneD`], [`TwoD`] and
//! [`ThreeD`], each carrying an associated `Point` type that implements
//! [`Vector`]. This lets the rest of the crate be written once against
//! `D: Dimension` instead of being duplicated per dimensionality.

use glam::DVec2;
use glam::DVec3;
use std::fmt::Debug;
use std::ops::Add;
use std::ops::AddAssign;
use std::ops::Div;
use std::ops::Mul;
use std::ops::Neg;
use std::ops::Sub;
use std::ops::SubAssign;

/// A real-valued vector in some number of spatial dimensions.
///
/// Implemented directly for `f64` (1D), `glam::DVec2` (2D) and
/// `glam::DVec3` (3D), so the same generic code works across all three.
pub trait Vector:
    Copy
    + Clone
    + Debug
    + PartialEq
    + Add<Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + SubAssign
    + Neg<Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
    + Send
    + Sync
    + 'static
{
    const ZERO: Self;

    fn dot(self, other: Self) -> f64;

    fn length_squared(self) -> f64 {
        self.dot(self)
    }

    fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    fn distance_squared(self, other: Self) -> f64 {
        (self - other).length_squared()
    }

    fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    fn normalize(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            self * (1.0 / len)
        } else {
            Self::ZERO
        }
    }

    /// Largest absolute component, used for the opening-angle criterion.
    fn max_element(self) -> f64;

    /// Per-component minimum.
    fn min_component_wise(self, other: Self) -> Self;

    /// Per-component maximum.
    fn max_component_wise(self, other: Self) -> Self;

    /// Component at `axis`, `axis < Dimension::NUM`.
    fn component(self, axis: usize) -> f64;

    /// Construct a vector with a single axis set to `value`, all else zero.
    fn on_axis(axis: usize, value: f64) -> Self;
}

impl Vector for f64 {
    const ZERO: Self = 0.0;

    fn dot(self, other: Self) -> f64 {
        self * other
    }

    fn max_element(self) -> f64 {
        self.abs()
    }

    fn min_component_wise(self, other: Self) -> Self {
        self.min(other)
    }

    fn max_component_wise(self, other: Self) -> Self {
        self.max(other)
    }

    fn component(self, axis: usize) -> f64 {
        debug_assert_eq!(axis, 0);
        self
    }

    fn on_axis(axis: usize, value: f64) -> Self {
        debug_assert_eq!(axis, 0);
        value
    }
}

impl Vector for DVec2 {
    const ZERO: Self = DVec2::ZERO;

    fn dot(self, other: Self) -> f64 {
        DVec2::dot(self, other)
    }

    fn max_element(self) -> f64 {
        self.x.abs().max(self.y.abs())
    }

    fn min_component_wise(self, other: Self) -> Self {
        self.min(other)
    }

    fn max_component_wise(self, other: Self) -> Self {
        self.max(other)
    }

    fn component(self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => panic!("axis {axis} out of range for 2D"),
        }
    }

    fn on_axis(axis: usize, value: f64) -> Self {
        match axis {
            0 => DVec2::new(value, 0.0),
            1 => DVec2::new(0.0, value),
            _ => panic!("axis {axis} out of range for 2D"),
        }
    }
}

impl Vector for DVec3 {
    const ZERO: Self = DVec3::ZERO;

    fn dot(self, other: Self) -> f64 {
        DVec3::dot(self, other)
    }

    fn max_element(self) -> f64 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }

    fn min_component_wise(self, other: Self) -> Self {
        self.min(other)
    }

    fn max_component_wise(self, other: Self) -> Self {
        self.max(other)
    }

    fn component(self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => panic!("axis {axis} out of range for 3D"),
        }
    }

    fn on_axis(axis: usize, value: f64) -> Self {
        match axis {
            0 => DVec3::new(value, 0.0, 0.0),
            1 => DVec3::new(0.0, value, 0.0),
            2 => DVec3::new(0.0, 0.0, value),
            _ => panic!("axis {axis} out of range for 3D"),
        }
    }
}

/// A spatial dimensionality: 1, 2 or 3.
///
/// `NUM` is the dimension count, `NUM_CHILDREN` is `2^NUM`, the branching
/// factor of the Barnes-Hut tree in that dimension.
pub trait Dimension: Copy + Clone + Debug + Send + Sync + 'static {
    const NUM: usize;
    const NUM_CHILDREN: usize;

    type Point: Vector;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreeD;

impl Dimension for OneD {
    const NUM: usize = 1;
    const NUM_CHILDREN: usize = 2;
    type Point = f64;
}

impl Dimension for TwoD {
    const NUM: usize = 2;
    const NUM_CHILDREN: usize = 4;
    type Point = DVec2;
}

impl Dimension for ThreeD {
    const NUM: usize = 3;
    const NUM_CHILDREN: usize = 8;
    type Point = DVec3;
}
