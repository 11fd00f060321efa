//! Segment preparation benchmarks
//!
//! - Shepard approximation at increasing sample density
//! - Route planning on an approximated segment
//! - One fuzzy controller decision
//!
//! Run with: cargo bench -p rivernav_library --bench approximation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rivernav_core::Grid;
use rivernav_library::{Approximator, FuzzyController, RoutePlanner, ZoneSoundings};

/// Fraction of cells carrying a measurement
const KNOWN_FRACTIONS: &[f64] = &[0.01, 0.05, 0.2];

fn survey(width: usize, height: usize, known: f64, seed: u64) -> Grid<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = Grid::new(width, height);
    for y in 0..height {
        for x in 0..width {
            if rng.gen_bool(known) {
                grid.set(x, y, rng.gen_range(0.5..20.0));
            }
        }
    }
    grid
}

fn bench_approximation(c: &mut Criterion) {
    let mut group = c.benchmark_group("shepard_approximation");
    group.sample_size(20);

    for &known in KNOWN_FRACTIONS {
        let grid = survey(60, 80, known, 7);
        group.bench_with_input(BenchmarkId::from_parameter(known), &grid, |b, grid| {
            b.iter(|| {
                let filled = Approximator::new().approximated(black_box(grid));
                black_box(filled)
            });
        });
    }

    group.finish();
}

fn bench_route_planning(c: &mut Criterion) {
    let grid = Approximator::new()
        .approximated(&survey(100, 200, 0.05, 11))
        .unwrap();
    let planner = RoutePlanner::new();

    c.bench_function("route_planner_100x200", |b| {
        b.iter(|| black_box(planner.plan(black_box(&grid), 50)));
    });
}

fn bench_controller(c: &mut Criterion) {
    let controller = FuzzyController::new(10.0, 5.0);
    let front: Vec<f32> = (0..15).map(|i| 1.0 + i as f32 * 0.3).collect();
    let left: Vec<f32> = (0..30).map(|i| 8.0 - i as f32 * 0.1).collect();
    let right: Vec<f32> = (0..30).map(|i| 2.0 + i as f32 * 0.05).collect();
    let soundings = ZoneSoundings {
        front: &front,
        left: &left,
        right: &right,
    };

    c.bench_function("fuzzy_decision", |b| {
        b.iter(|| black_box(controller.decide(black_box(&soundings), 1.0, 8.0)));
    });
}

criterion_group!(benches, bench_approximation, bench_route_planning, bench_controller);
criterion_main!(benches);
