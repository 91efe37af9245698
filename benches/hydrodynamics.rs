//! End-to-end benchmark of one full predictor-corrector step (ghost
//! management, tree builds, smoothing-length solve, force sums) for each
//! fluid formulation, on a fixed-size Kelvin-Helmholtz setup.

use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;

use sph_core::driver::Sim;
use sph_core::error::LoggingSphLog;
use sph_core::ics;
use sph_core::output::NullOutputSink;
use sph_core::parameters::ParameterBuilder;

fn bench_ssph_step(c: &mut Criterion) {
    c.bench_function("ssph_kelvin_helmholtz_step_2000", |b| {
        b.iter_batched(
            || {
                let (particles, boundary) = ics::kelvin_helmholtz(2000, 2.0, 1.0, 0.5, -0.5, 2.5, 5.0 / 3.0);
                let params = ParameterBuilder::new()
                    .gamma(5.0 / 3.0)
                    .boundary(boundary)
                    .as_ssph()
                    .build()
                    .unwrap();
                Sim::new(particles, params)
            },
            |mut sim| {
                let mut sink = NullOutputSink;
                let mut log = LoggingSphLog;
                sim.step(&mut sink, &mut log).unwrap();
                black_box(sim.time());
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

fn bench_disph_step(c: &mut Criterion) {
    c.bench_function("disph_kelvin_helmholtz_step_2000", |b| {
        b.iter_batched(
            || {
                let (particles, boundary) = ics::kelvin_helmholtz(2000, 2.0, 1.0, 0.5, -0.5, 2.5, 5.0 / 3.0);
                let params = ParameterBuilder::new()
                    .gamma(5.0 / 3.0)
                    .boundary(boundary)
                    .as_disph()
                    .build()
                    .unwrap();
                Sim::new(particles, params)
            },
            |mut sim| {
                let mut sink = NullOutputSink;
                let mut log = LoggingSphLog;
                sim.step(&mut sink, &mut log).unwrap();
                black_box(sim.time());
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

fn bench_gsph_step(c: &mut Criterion) {
    c.bench_function("gsph_kelvin_helmholtz_step_2000", |b| {
        b.iter_batched(
            || {
                let (particles, boundary) = ics::kelvin_helmholtz(2000, 2.0, 1.0, 0.5, -0.5, 2.5, 5.0 / 3.0);
                let params = ParameterBuilder::new()
                    .gamma(5.0 / 3.0)
                    .boundary(boundary)
                    .as_gsph()
                    .build()
                    .unwrap();
                Sim::new(particles, params)
            },
            |mut sim| {
                let mut sink = NullOutputSink;
                let mut log = LoggingSphLog;
                sim.step(&mut sink, &mut log).unwrap();
                black_box(sim.time());
            },
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_ssph_step, bench_disph_step, bench_gsph_step);
criterion_main!(benches);
