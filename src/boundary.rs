//! Boundary configuration: periodic wrap or Morris (1997) mirror walls,
//! specified independently per axis and per side of that axis.

use crate::dimension::Dimension;
use crate::extent::Extent;

/// The boundary behavior on one side of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// No ghosts are generated; particles may leave the domain freely.
    Open,
    /// Wrapped to the opposite side of the domain; requires the opposite
    /// side to also be `Periodic`.
    Periodic,
    /// A Morris (1997) mirror wall.
    Mirror(MirrorKind),
}

/// The reflection rule applied to a mirrored ghost's velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorKind {
    /// Tangential velocity preserved, normal velocity reversed.
    FreeSlip,
    /// Both components reversed, enforcing zero velocity at the wall.
    NoSlip,
}

/// Boundary configuration for one axis: the domain's extent along that
/// axis plus the kind of wall at each end.
#[derive(Debug, Clone, Copy)]
pub struct AxisBoundary {
    pub lower: f64,
    pub upper: f64,
    pub lower_kind: BoundaryKind,
    pub upper_kind: BoundaryKind,
    /// Particle spacing at the lower wall (spec §4.4 Morris 1997): the
    /// mirror plane sits half a spacing outside `lower`, at
    /// `lower - 0.5 * lower_spacing`. Unused by `Open`/`Periodic` walls.
    pub lower_spacing: f64,
    /// Same as `lower_spacing`, for the upper wall: the mirror plane sits
    /// at `upper + 0.5 * upper_spacing`.
    pub upper_spacing: f64,
}

impl AxisBoundary {
    pub fn periodic(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            lower_kind: BoundaryKind::Periodic,
            upper_kind: BoundaryKind::Periodic,
            lower_spacing: 0.0,
            upper_spacing: 0.0,
        }
    }

    pub fn open(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            lower_kind: BoundaryKind::Open,
            upper_kind: BoundaryKind::Open,
            lower_spacing: 0.0,
            upper_spacing: 0.0,
        }
    }

    /// A mirror wall on both sides, with `spacing` the particle spacing
    /// used to place the wall's reflection plane (spec §4.4).
    pub fn mirrored(lower: f64, upper: f64, kind: MirrorKind) -> Self {
        Self::mirrored_with_spacing(lower, upper, kind, 0.0, 0.0)
    }

    /// Same as `mirrored`, with an explicit per-wall particle spacing.
    pub fn mirrored_with_spacing(
        lower: f64,
        upper: f64,
        kind: MirrorKind,
        lower_spacing: f64,
        upper_spacing: f64,
    ) -> Self {
        Self {
            lower,
            upper,
            lower_kind: BoundaryKind::Mirror(kind),
            upper_kind: BoundaryKind::Mirror(kind),
            lower_spacing,
            upper_spacing,
        }
    }

    pub fn length(&self) -> f64 {
        self.upper - self.lower
    }

    /// The lower wall's reflection plane: `lower - 0.5 * lower_spacing`.
    pub fn lower_wall(&self) -> f64 {
        self.lower - 0.5 * self.lower_spacing
    }

    /// The upper wall's reflection plane: `upper + 0.5 * upper_spacing`.
    pub fn upper_wall(&self) -> f64 {
        self.upper + 0.5 * self.upper_spacing
    }
}

/// Per-axis boundary configuration for a `D`-dimensional domain.
#[derive(Debug, Clone)]
pub struct BoundaryConfig<D: Dimension> {
    pub axes: Vec<AxisBoundary>,
    _marker: std::marker::PhantomData<D>,
}

impl<D: Dimension> BoundaryConfig<D> {
    /// `axes` must have exactly `D::NUM` entries.
    pub fn new(axes: Vec<AxisBoundary>) -> Self {
        assert_eq!(
            axes.len(),
            D::NUM,
            "boundary config must specify exactly one axis entry per dimension"
        );
        Self {
            axes,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn all_periodic(lower: D::Point, upper: D::Point) -> Self {
        let axes = (0..D::NUM)
            .map(|axis| AxisBoundary::periodic(lower.component(axis), upper.component(axis)))
            .collect();
        Self::new(axes)
    }

    pub fn as_extent(&self) -> Extent<D> {
        let min = (0..D::NUM).fold(D::Point::ZERO, |acc, axis| {
            acc + D::Point::on_axis(axis, self.axes[axis].lower)
        });
        let max = (0..D::NUM).fold(D::Point::ZERO, |acc, axis| {
            acc + D::Point::on_axis(axis, self.axes[axis].upper)
        });
        Extent::new(min, max)
    }

    pub fn is_periodic(&self, axis: usize) -> bool {
        matches!(self.axes[axis].lower_kind, BoundaryKind::Periodic)
            && matches!(self.axes[axis].upper_kind, BoundaryKind::Periodic)
    }
}

use crate::dimension::Vector;
