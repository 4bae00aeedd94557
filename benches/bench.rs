use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use nonogram_sat::nonogram::complexity;
use nonogram_sat::nonogram::config::generate;
use nonogram_sat::nonogram::encoder::{Encoder, EncoderConfig, Exclusivity};
use nonogram_sat::nonogram::model::{Clue, PuzzleModel};
use nonogram_sat::nonogram::random::random_puzzle;
use nonogram_sat::nonogram::solver::{SolveOptions, solve};
use nonogram_sat::sat::cnf::Cnf;
use std::hint::black_box;
use std::time::Duration;

fn puzzles(size: usize, count: u64) -> Vec<PuzzleModel> {
    (0..count)
        .filter_map(|seed| random_puzzle("bench", size, size, 0.6, Some(seed)).ok())
        .map(|(model, _)| model)
        .collect()
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("nonogram - Line configurations");

    for (length, runs) in [(15, vec![3u32, 1, 2]), (20, vec![1, 1, 1, 1]), (25, vec![4, 2, 2, 3])] {
        let clue = Clue::from(runs);
        group.bench_with_input(
            BenchmarkId::new(format!("[{clue}]"), length),
            &(length, clue),
            |b, (length, clue)| b.iter(|| black_box(generate(*length, clue).count())),
        );
    }

    group.finish();
}

fn bench_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("nonogram - Encoding");
    group.sample_size(30);
    group.measurement_time(Duration::from_secs(10));

    let models = puzzles(15, 10);

    group.bench_function("Estimate", |b| {
        b.iter(|| {
            for model in &models {
                black_box(complexity::estimate(model));
            }
        });
    });

    for (label, config) in [
        ("Sequential", EncoderConfig::default()),
        ("Parallel", EncoderConfig::default().with_parallel(true)),
        (
            "Exactly one",
            EncoderConfig::default().with_exclusivity(Exclusivity::ExactlyOne),
        ),
    ] {
        let encoder = Encoder::new(config);
        group.bench_function(label, |b| {
            b.iter(|| {
                for model in &models {
                    let mut cnf = Cnf::default();
                    black_box(encoder.encode(model, &mut cnf).ok());
                }
            });
        });
    }

    group.finish();
}

fn bench_solving(c: &mut Criterion) {
    let mut group = c.benchmark_group("nonogram - Solve");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(15));

    for size in [5, 8, 10] {
        let models = puzzles(size, 5);
        group.bench_with_input(BenchmarkId::new("DPLL", size), &models, |b, models| {
            b.iter(|| {
                for model in models {
                    black_box(solve(model, SolveOptions::default()).ok());
                }
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generation, bench_encoding, bench_solving);

criterion_main!(benches);
