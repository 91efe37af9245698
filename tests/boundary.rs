//! Ghost-layer accounting (spec §8 S4) and the periodic/mirror boundary
//! invariants exercised through the public `ghost`/`boundary` API directly,
//! independent of the full force pipeline.

use sph_core::boundary::AxisBoundary;
use sph_core::boundary::BoundaryConfig;
use sph_core::boundary::MirrorKind;
use sph_core::dimension::OneD;
use sph_core::dimension::TwoD;
use sph_core::ghost::GhostManager;
use sph_core::particle::Particle;
use sph_core::particle::ParticleKind;

fn make_1d(id: u64, x: f64, v: f64) -> Particle<OneD> {
    Particle {
        id,
        kind: ParticleKind::Real,
        position: x,
        velocity: v,
        acceleration: 0.0,
        mass: 1.0,
        density: 1.0,
        pressure: 1.0,
        energy: 1.0,
        denergy_dt: 0.0,
        smoothing_length: 0.1,
        sound_speed: 1.0,
        grad_h: 1.0,
        balsara: 1.0,
        alpha: 1.0,
        velocity_divergence: 0.0,
        gravitational_potential: 0.0,
        neighbor_count: 0,
    }
}

fn make_2d(id: u64, x: f64, y: f64) -> Particle<TwoD> {
    Particle {
        id,
        kind: ParticleKind::Real,
        position: glam::DVec2::new(x, y),
        velocity: glam::DVec2::ZERO,
        acceleration: glam::DVec2::ZERO,
        mass: 1.0,
        density: 1.0,
        pressure: 1.0,
        energy: 1.0,
        denergy_dt: 0.0,
        smoothing_length: 0.1,
        sound_speed: 1.0,
        grad_h: 1.0,
        balsara: 1.0,
        alpha: 1.0,
        velocity_divergence: 0.0,
        gravitational_potential: 0.0,
        neighbor_count: 0,
    }
}

#[test]
fn periodic_domain_produces_ghosts_only_near_walls() {
    let boundary = BoundaryConfig::<OneD>::new(vec![AxisBoundary::periodic(0.0, 1.0)]);
    let mut manager = GhostManager::new(boundary);
    let real = vec![make_1d(0, 0.5, 0.0), make_1d(1, 0.02, 0.0), make_1d(2, 0.98, 0.0)];
    manager.regenerate(&real, 0.1);
    // Only the two particles near a wall should produce a ghost; the
    // interior one at x=0.5 should not.
    assert_eq!(manager.ghost_count(), 2);
    let search = manager.build_search_particles(&real);
    assert_eq!(search.real_count(), 3);
    assert_eq!(search.total_count(), 5);
}

#[test]
fn mirror_corner_produces_composed_reflections() {
    let boundary = BoundaryConfig::<TwoD>::new(vec![
        AxisBoundary::mirrored(0.0, 1.0, MirrorKind::FreeSlip),
        AxisBoundary::mirrored(0.0, 1.0, MirrorKind::FreeSlip),
    ]);
    let mut manager = GhostManager::new(boundary);
    // Sitting in the corner, close to both walls: expect 3 ghosts (one per
    // wall, plus the diagonal corner ghost from reflecting both axes).
    let real = vec![make_2d(0, 0.02, 0.02)];
    manager.regenerate(&real, 0.5);
    assert_eq!(manager.ghost_count(), 3);
}

#[test]
fn wrap_then_regenerate_keeps_ghost_count_stable_across_steps() {
    let boundary = BoundaryConfig::<OneD>::new(vec![AxisBoundary::periodic(0.0, 1.0)]);
    let mut manager = GhostManager::new(boundary);
    let mut real = vec![make_1d(0, 0.99, 0.5)];
    for _ in 0..5 {
        manager.wrap_periodic(&mut real);
        manager.regenerate(&real, 0.1);
        assert!(real[0].position >= 0.0 && real[0].position < 1.0);
        real[0].position += 0.05;
    }
}

#[test]
fn open_boundary_never_produces_ghosts() {
    let boundary = BoundaryConfig::<OneD>::new(vec![AxisBoundary::open(0.0, 1.0)]);
    let mut manager = GhostManager::new(boundary);
    let real = vec![make_1d(0, 0.001, 0.0), make_1d(1, 0.999, 0.0)];
    manager.regenerate(&real, 0.5);
    assert_eq!(manager.ghost_count(), 0);
}
