use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use slide_2048::engine::{Direction, Grid};
use slide_2048::session::GameSession;
use std::hint::black_box;

fn corpus() -> Vec<Grid> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut grids = Vec::new();
    // Empty and two-tile starts
    grids.push(Grid::EMPTY);
    let mut g = Grid::new_game(&mut rng);
    grids.push(g);
    // Derive a variety of densities deterministically
    let seq = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
    for i in 0..40 {
        let out = g.apply(seq[i % seq.len()]);
        if out.changed {
            if let Ok(next) = out.grid.with_random_tile(&mut rng) {
                g = next;
            }
        }
        grids.push(g);
    }
    grids
}

fn bench_apply(c: &mut Criterion) {
    let grids = corpus();
    for dir in Direction::ALL {
        c.bench_function(&format!("apply/{dir}"), |b| {
            b.iter(|| {
                let mut acc = 0u64;
                for &g in &grids {
                    acc ^= g.apply(dir).score_delta;
                }
                black_box(acc)
            })
        });
    }
}

fn bench_status(c: &mut Criterion) {
    let grids = corpus();
    c.bench_function("status", |b| {
        b.iter(|| grids.iter().filter(|g| g.is_game_over()).count())
    });
}

fn bench_spawn(c: &mut Criterion) {
    let grids = corpus();
    let mut rng = StdRng::seed_from_u64(7);
    c.bench_function("with_random_tile", |b| {
        b.iter(|| {
            for &g in &grids {
                black_box(g.with_random_tile(&mut rng).ok());
            }
        })
    });
}

fn bench_session_step(c: &mut Criterion) {
    c.bench_function("session/step_cycle", |b| {
        b.iter(|| {
            let mut s = GameSession::with_seed(3);
            for dir in Direction::ALL.iter().cycle().take(64) {
                black_box(s.move_direction(*dir));
            }
        })
    });
}

criterion_group!(benches, bench_apply, bench_status, bench_spawn, bench_session_step);
criterion_main!(benches);
