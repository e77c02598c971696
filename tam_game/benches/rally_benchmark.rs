//! Rally poll benchmark: the pure per-poll work of the main loop.
//!
//! Measures zone resolution, the paddle window and the heading math that
//! run between two motor reads. Hardware reads are excluded.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use tam_common::hal::types::Side;
use tam_game::ball::{axis_velocities, reflect_off_paddle, reflect_off_wall};
use tam_game::config::RulesConfig;
use tam_game::game::rally::{Field, RallyMarkers, Touch, paddle_contact};

/// Ball positions sweeping the table diagonally [tacho].
fn sweep(n: usize) -> Vec<(i32, i32)> {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64;
            ((t * 940.0) as i32, ((1.0 - t) * 856.0) as i32)
        })
        .collect()
}

fn bench_zone(c: &mut Criterion) {
    let field = Field::new(940.0, 856.0, &RulesConfig::default());
    let mut markers = RallyMarkers::new();
    markers.record(Touch::Paddle(Side::Player2));

    let mut group = c.benchmark_group("zone");
    for n in [16usize, 256, 4096] {
        let points = sweep(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &points, |b, points| {
            b.iter(|| {
                let mut hits = 0usize;
                for &(x, y) in points {
                    if field.zone(black_box(&markers), x, y).is_some() {
                        hits += 1;
                    }
                }
                hits
            });
        });
    }
    group.finish();
}

fn bench_paddle(c: &mut Criterion) {
    c.bench_function("paddle_hit", |b| {
        b.iter(|| {
            let contact = paddle_contact(black_box(420), black_box(380.0), 142.6, 10);
            let angle = contact
                .map(|at| reflect_off_paddle(black_box(183.0), at, 142.6))
                .unwrap_or_else(|| reflect_off_wall(black_box(183.0)));
            axis_velocities(black_box(165.0), angle)
        });
    });
}

criterion_group!(benches, bench_zone, bench_paddle);
criterion_main!(benches);
