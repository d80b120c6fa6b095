use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use clonecall::core::{log_fact, BaseCount, CellCount, PosData};
use clonecall::filter::{identity_positions, is_significant, Filter};

const N: usize = 100_000; // Number of random positions
const N_CELLS: u32 = 50;

fn random_counts() -> Vec<BaseCount> {
    let mut rng = StdRng::seed_from_u64(0);
    (0..N)
        .map(|_| {
            BaseCount::new(
                rng.gen_range(0..200),
                rng.gen_range(0..3),
                rng.gen_range(0..3),
                rng.gen_range(0..40),
            )
        })
        .collect()
}

fn random_pileup() -> Vec<Vec<PosData>> {
    let mut rng = StdRng::seed_from_u64(1);
    (0..4)
        .map(|_| {
            (0..N as u32 / 10)
                .map(|position| {
                    let cells = (0..N_CELLS)
                        .map(|cell_id| {
                            let counts = BaseCount::new(
                                rng.gen_range(0..8),
                                0,
                                0,
                                if rng.gen_bool(0.1) { rng.gen_range(0..4) } else { 0 },
                            );
                            CellCount::new(cell_id, counts)
                        })
                        .collect();
                    PosData::new(position * 3, cells)
                })
                .collect()
        })
        .collect()
}

fn bench_log_fact(c: &mut Criterion) {
    c.bench_function("log_fact", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for n in 0..2000u32 {
                sum += log_fact(black_box(n));
            }
            black_box(sum)
        })
    });
}

fn bench_is_significant(c: &mut Criterion) {
    let counts = random_counts();
    c.bench_function("is_significant", |b| {
        b.iter(|| {
            let mut kept = 0usize;
            for count in &counts {
                if is_significant(black_box(count), 1e-3) {
                    kept += 1;
                }
            }
            black_box(kept)
        })
    });
}

fn bench_filter(c: &mut Criterion) {
    let pileup = random_pileup();
    let id_to_group: Vec<u32> = (0..N_CELLS).map(|c| c / 5).collect();
    let id_to_pos = identity_positions(N_CELLS as usize / 5);
    let filter = Filter::new();

    let mut group = c.benchmark_group("filter");
    for threads in [1, 4] {
        group.bench_function(format!("threads_{}", threads), |b| {
            b.iter(|| {
                filter
                    .filter(black_box(&pileup), &id_to_group, &id_to_pos, "bench", 1e-3, threads)
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_log_fact, bench_is_significant, bench_filter);
criterion_main!(benches);
