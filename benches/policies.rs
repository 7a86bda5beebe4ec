use criterion::{criterion_group, criterion_main, Criterion};
use slide_2048::engine::Grid;
use slide_2048::policy::{BoundedExpectimax, DepthSchedule, GreedyLookahead, SearchConfig};
use std::hint::black_box;

fn mid_game() -> Grid {
    Grid::new([[2, 4, 8, 16], [0, 2, 4, 32], [0, 0, 2, 64], [0, 0, 0, 128]])
}

fn bench_greedy(c: &mut Criterion) {
    let g = mid_game();
    let mut group = c.benchmark_group("greedy");
    group.sample_size(20);
    for depth in [1u32, 2, 3] {
        group.bench_function(format!("depth{depth}"), |b| {
            let cfg = SearchConfig { depth: DepthSchedule::Fixed(depth), seed: Some(1), ..SearchConfig::greedy() };
            let mut p = GreedyLookahead::with_config(cfg);
            b.iter(|| black_box(p.best_move(g)))
        });
    }
    group.finish();
}

fn bench_expectimax(c: &mut Criterion) {
    let g = mid_game();
    let mut group = c.benchmark_group("expectimax");
    group.sample_size(20);
    for depth in [1u32, 2, 3] {
        group.bench_function(format!("depth{depth}"), |b| {
            let cfg = SearchConfig { depth: DepthSchedule::Fixed(depth), seed: Some(1), ..SearchConfig::expectimax() };
            let mut p = BoundedExpectimax::with_config(cfg);
            b.iter(|| black_box(p.best_move(g)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_greedy, bench_expectimax);
criterion_main!(benches);
