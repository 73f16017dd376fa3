#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use sandlot_core::{parse_sequence, simulate_inning};
use sandlot_simulator::{run_batch, BatchSpec, OutcomeDistribution};

/// Throughput of a single scripted inning through the state machine.
fn benchmark_scripted_inning(c: &mut Criterion) {
    let outcomes = parse_sequence("2EBB1DB12f").unwrap();

    c.bench_function("scripted_inning", |b| {
        b.iter(|| black_box(simulate_inning(outcomes.iter().copied()).unwrap()))
    });
}

/// Dice-driven innings, one seeded source per inning.
fn benchmark_dice_inning(c: &mut Criterion) {
    let distribution = OutcomeDistribution::from_dice_table().unwrap();
    let mut seed = 0u64;

    c.bench_function("dice_inning", |b| {
        b.iter(|| {
            seed += 1;
            let source = distribution.source(SmallRng::seed_from_u64(seed));
            black_box(simulate_inning(source).unwrap())
        })
    });
}

/// Simulation throughput of a full parallel batch.
fn benchmark_batch_throughput(c: &mut Criterion) {
    let distribution = OutcomeDistribution::from_dice_table().unwrap();
    let spec = BatchSpec {
        seed: 42,
        innings: 100_000,
        innings_per_game: 9,
    };

    c.bench_function("batch_throughput", |b| {
        b.iter(|| black_box(run_batch(&distribution, spec).unwrap()))
    });
}

criterion_group!(
    benches,
    benchmark_scripted_inning,
    benchmark_dice_inning,
    benchmark_batch_throughput
);
criterion_main!(benches);
