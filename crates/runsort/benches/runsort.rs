use std::hint::black_box;
use std::time::Duration;

use bench::{
    ALL_PATTERNS, apply_large_runtime_config, apply_small_runtime_config, generate_pattern,
    pattern_name,
};
use criterion::measurement::Measurement;
use criterion::{
    BenchmarkGroup, BenchmarkId, Criterion, SamplingMode, criterion_group, criterion_main,
};
use runsort::{MergeBuffer, all_rules, rule_name, sort_sequence_range_with_buffer};

const BENCH_SIZES: [usize; 3] = [4096, 65536, 262144];

fn bench_runsort(c: &mut Criterion) {
    for &pattern in &ALL_PATTERNS {
        let mut group = c.benchmark_group(format!("runsort/{}", pattern_name(pattern)));

        for &rule in all_rules() {
            for &size in &BENCH_SIZES {
                apply_runtime(&mut group, size);
                let base = generate_pattern(pattern, size, rule as u64);

                group.bench_function(BenchmarkId::new(rule_name(rule), size), |bencher| {
                    bencher.iter_custom(|iters| {
                        let mut total = Duration::ZERO;
                        let mut buffer = MergeBuffer::new();
                        for _ in 0..iters {
                            let mut data = base.clone();
                            let len = data.len();
                            let start = std::time::Instant::now();
                            sort_sequence_range_with_buffer(
                                rule,
                                data.as_mut_slice(),
                                0,
                                len,
                                u64::cmp,
                                &mut buffer,
                            );
                            total += start.elapsed();
                            black_box(&data);
                        }
                        total
                    });
                });
            }
        }

        for &size in &BENCH_SIZES {
            apply_runtime(&mut group, size);
            let base = generate_pattern(pattern, size, 0xBA5E_0001);
            group.bench_function(BenchmarkId::new("std_stable", size), |bencher| {
                bencher.iter_custom(|iters| {
                    let mut total = Duration::ZERO;
                    for _ in 0..iters {
                        let mut data = base.clone();
                        let start = std::time::Instant::now();
                        data.sort();
                        total += start.elapsed();
                        black_box(&data);
                    }
                    total
                });
            });
        }

        group.finish();
    }
}

fn apply_runtime<M: Measurement>(group: &mut BenchmarkGroup<'_, M>, size: usize) {
    if size <= 16384 {
        group.sampling_mode(SamplingMode::Auto);
        apply_small_runtime_config(group);
    } else {
        group.sampling_mode(SamplingMode::Flat);
        apply_large_runtime_config(group);
    }
}

criterion_group!(benches, bench_runsort);
criterion_main!(benches);
