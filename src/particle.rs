//! Particle records and the real/search two-type access discipline.
//!
//! The driver works with two disjoint views over the same step's data:
//! [`RealParticles`], a mutable slice of only the simulated (non-ghost)
//! particles, and [`SearchParticles`], a read-only view of the full search
//! universe (real particles followed by ghosts) used while walking the
//! tree. Keeping them as distinct newtypes rather than passing plain
//! slices everywhere means code that looks up a neighbor cannot
//! accidentally index into the real array with a universe index or vice
//! versa — that class of bug simply has no expressible call in the type
//! system, it is not merely discouraged by convention.

use std::ops::Index;

use crate::dimension::Dimension;

/// Whether a particle is part of the simulated system or a ghost mirroring
/// one for boundary purposes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleKind<D: Dimension> {
    Real,
    Ghost {
        /// Index, within the real range, of the particle this ghost mirrors.
        source: usize,
        transform: GhostTransform<D>,
    },
}

/// How a ghost's state is derived from its source real particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GhostTransform<D: Dimension> {
    /// Position offset by a periodic box translation; velocity unchanged.
    Periodic { offset: D::Point },
    /// Reflected across one or more boundary planes (more than one only
    /// at a composed corner/edge ghost), per the Morris (1997)
    /// mirror-particle convention. Indexed by axis; `None` means that axis
    /// is not reflected. Sized to the largest supported dimensionality
    /// rather than `D::NUM` since `GhostTransform` must stay `Copy`.
    Mirror {
        reflections: [Option<(f64, bool)>; 3],
    },
}

/// One particle's full state.
#[derive(Debug, Clone, Copy)]
pub struct Particle<D: Dimension> {
    pub id: u64,
    pub kind: ParticleKind<D>,
    pub position: D::Point,
    pub velocity: D::Point,
    pub acceleration: D::Point,
    pub mass: f64,
    pub density: f64,
    pub pressure: f64,
    /// Specific internal energy.
    pub energy: f64,
    pub denergy_dt: f64,
    pub smoothing_length: f64,
    pub sound_speed: f64,
    /// grad-h correction factor `f_i` (spec §4.5).
    pub grad_h: f64,
    /// Balsara switch value in `[0, 1]`.
    pub balsara: f64,
    /// Time-dependent artificial viscosity coefficient.
    pub alpha: f64,
    /// `∇·v` from the most recent gradient pass (spec §4.5); feeds the
    /// Balsara switch, the alpha-decay ODE, and the Courant timestep bound
    /// (spec §4.8).
    pub velocity_divergence: f64,
    pub gravitational_potential: f64,
    pub neighbor_count: usize,
}

impl<D: Dimension> Particle<D> {
    pub fn is_real(&self) -> bool {
        matches!(self.kind, ParticleKind::Real)
    }

    pub fn is_ghost(&self) -> bool {
        !self.is_real()
    }
}

/// An index into a [`SearchParticles`] universe. Distinct from a plain
/// `usize` so it cannot be used to index a [`RealParticles`] slice or a
/// bare `&[Particle<D>]` by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct NeighborIndex(pub(crate) usize);

impl NeighborIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

/// Mutable access to only the real (simulated) particles of a step.
pub struct RealParticles<'a, D: Dimension> {
    particles: &'a mut [Particle<D>],
}

impl<'a, D: Dimension> RealParticles<'a, D> {
    /// `particles` must contain only real particles; ghosts are appended
    /// separately when a [`SearchParticles`] universe is built.
    pub fn new(particles: &'a mut [Particle<D>]) -> Self {
        debug_assert!(particles.iter().all(Particle::is_real));
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn as_slice(&self) -> &[Particle<D>] {
        self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle<D>] {
        self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle<D>> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle<D>> {
        self.particles.iter_mut()
    }

    pub fn par_iter_mut(&mut self) -> rayon::slice::IterMut<'_, Particle<D>>
    where
        Particle<D>: Send,
    {
        use rayon::prelude::*;
        self.particles.par_iter_mut()
    }
}

/// Read-only access to the full search universe (real particles followed
/// by ghosts) for one step. Constructed by [`crate::ghost::GhostManager`].
pub struct SearchParticles<D: Dimension> {
    universe: Vec<Particle<D>>,
    real_count: usize,
}

impl<D: Dimension> SearchParticles<D> {
    pub fn new(real: &[Particle<D>], ghosts: Vec<Particle<D>>) -> Self {
        let mut universe = Vec::with_capacity(real.len() + ghosts.len());
        universe.extend_from_slice(real);
        let real_count = universe.len();
        universe.extend(ghosts);
        Self {
            universe,
            real_count,
        }
    }

    pub fn real_count(&self) -> usize {
        self.real_count
    }

    pub fn total_count(&self) -> usize {
        self.universe.len()
    }

    pub fn as_slice(&self) -> &[Particle<D>] {
        &self.universe
    }

    /// The only way to obtain a [`NeighborIndex`]: enumerate all indices in
    /// the universe. There is no constructor that takes an arbitrary
    /// `usize`, so a caller can never forge an out-of-range or
    /// wrong-provenance index.
    pub fn indices(&self) -> impl Iterator<Item = NeighborIndex> + '_ {
        (0..self.universe.len()).map(NeighborIndex)
    }

    pub fn accessor(&self) -> NeighborAccessor<'_, D> {
        NeighborAccessor { universe: self }
    }
}

impl<D: Dimension> Index<NeighborIndex> for SearchParticles<D> {
    type Output = Particle<D>;

    fn index(&self, index: NeighborIndex) -> &Particle<D> {
        &self.universe[index.0]
    }
}

/// A handle for looking up particles by [`NeighborIndex`], obtainable only
/// from a [`SearchParticles`] universe. Exists mainly as a readable
/// call-site name (`accessor.get(idx)`) distinct from direct slice
/// indexing; the safety property lives in `NeighborIndex` itself.
pub struct NeighborAccessor<'a, D: Dimension> {
    universe: &'a SearchParticles<D>,
}

impl<'a, D: Dimension> NeighborAccessor<'a, D> {
    pub fn get(&self, index: NeighborIndex) -> &'a Particle<D> {
        &self.universe.universe[index.0]
    }
}
