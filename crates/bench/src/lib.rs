use std::time::Duration;

use criterion::BenchmarkGroup;
use criterion::measurement::Measurement;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SMALL_RUNTIME_SAMPLE_SIZE: usize = 15;
const SMALL_RUNTIME_WARM_UP_MS: u64 = 100;
const SMALL_RUNTIME_MEASURE_MS: u64 = 200;
const LARGE_RUNTIME_SAMPLE_SIZE: usize = 10;
const LARGE_RUNTIME_WARM_UP_MS: u64 = 500;
const LARGE_RUNTIME_MEASURE_MS: u64 = 1000;
const RNG_SEED: u64 = 0x5EED_2026;

pub fn apply_small_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(SMALL_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(SMALL_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(SMALL_RUNTIME_MEASURE_MS));
}

pub fn apply_large_runtime_config<M: Measurement>(group: &mut BenchmarkGroup<'_, M>) {
    group.sample_size(LARGE_RUNTIME_SAMPLE_SIZE);
    group.warm_up_time(Duration::from_millis(LARGE_RUNTIME_WARM_UP_MS));
    group.measurement_time(Duration::from_millis(LARGE_RUNTIME_MEASURE_MS));
}

pub fn seeded_rng(salt: u64) -> StdRng {
    StdRng::seed_from_u64(mix_seed(RNG_SEED ^ salt))
}

/// Input shapes that stress a run-adaptive sort differently.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputPattern {
    RandomUniform,
    NearlySorted1pctSwaps,
    Descending,
    SawtoothRuns256,
    FewUnique16,
}

pub const ALL_PATTERNS: [InputPattern; 5] = [
    InputPattern::RandomUniform,
    InputPattern::NearlySorted1pctSwaps,
    InputPattern::Descending,
    InputPattern::SawtoothRuns256,
    InputPattern::FewUnique16,
];

pub fn pattern_name(pattern: InputPattern) -> &'static str {
    match pattern {
        InputPattern::RandomUniform => "random_uniform",
        InputPattern::NearlySorted1pctSwaps => "nearly_sorted_1pct_swaps",
        InputPattern::Descending => "descending",
        InputPattern::SawtoothRuns256 => "sawtooth_runs_256",
        InputPattern::FewUnique16 => "few_unique_16",
    }
}

pub fn generate_pattern(pattern: InputPattern, size: usize, salt: u64) -> Vec<u64> {
    let mut rng = seeded_rng(((pattern as u64) << 32) ^ (size as u64) ^ salt);
    match pattern {
        InputPattern::RandomUniform => (0..size).map(|_| rng.random()).collect(),
        InputPattern::NearlySorted1pctSwaps => {
            let mut data: Vec<u64> = (0..size as u64).collect();
            let swaps = (size / 100).max(1);
            for _ in 0..swaps {
                let a = rng.random_range(0..size);
                let b = rng.random_range(0..size);
                data.swap(a, b);
            }
            data
        }
        InputPattern::Descending => (0..size as u64).rev().collect(),
        InputPattern::SawtoothRuns256 => (0..size).map(|i| (i % 256) as u64).collect(),
        InputPattern::FewUnique16 => (0..size).map(|_| rng.random_range(0..16)).collect(),
    }
}

#[inline]
fn mix_seed(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
