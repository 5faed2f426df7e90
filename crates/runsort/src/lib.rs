//! Stable adaptive merge sorting over natural runs.
//!
//! The engine detects the ascending (or reversed descending) runs the input
//! already contains, pads short ones by binary insertion, and merges pending
//! runs under one of two interchangeable merge-order rules: the classic
//! length-ratio invariant or the boundary-power rule, which schedules merges
//! along a near-optimal binary merge tree. Merging itself gallops: long
//! winning streaks from one side are located by exponential search and
//! bulk-copied instead of compared one by one.

mod buffer;
mod engine;
mod merge;
mod policy;
mod runs;
mod sequence;

use std::cmp::Ordering;

pub use buffer::MergeBuffer;
pub use sequence::Sequence;

/// Merge-order rule governing when pending runs collapse.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum MergeRule {
    /// Keep stack entry lengths growing at least Fibonacci-fast.
    #[default]
    RatioInvariant,
    /// Merge along the balanced binary partition of the input (powersort).
    BoundaryPower,
}

pub const ALL_RULES: [MergeRule; 2] = [MergeRule::RatioInvariant, MergeRule::BoundaryPower];

pub fn all_rules() -> &'static [MergeRule] {
    &ALL_RULES
}

pub fn rule_name(rule: MergeRule) -> &'static str {
    match rule {
        MergeRule::RatioInvariant => "ratio_invariant",
        MergeRule::BoundaryPower => "boundary_power",
    }
}

/// Stable sort in natural order under the default merge rule.
pub fn sort<T: Copy + Ord>(data: &mut [T]) {
    sort_with(MergeRule::default(), data, T::cmp);
}

/// Stable sort by a caller-supplied comparator under the default merge rule.
pub fn sort_by<T, F>(data: &mut [T], cmp: F)
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    sort_with(MergeRule::default(), data, cmp);
}

/// Stable sort by a comparator under an explicit merge rule.
pub fn sort_with<T, F>(rule: MergeRule, data: &mut [T], cmp: F)
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    let len = data.len();
    sort_range_with(rule, data, 0, len, cmp);
}

/// Stable sort of `data[first..last]`; the rest of the slice is untouched.
///
/// Panics if `first > last` or `last > data.len()`, before moving anything.
pub fn sort_range_with<T, F>(rule: MergeRule, data: &mut [T], first: usize, last: usize, cmp: F)
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut buffer = MergeBuffer::new();
    sort_sequence_range_with_buffer(rule, data, first, last, cmp, &mut buffer);
}

/// Stable sort of any [`Sequence`] by a comparator.
pub fn sort_sequence_with<S, F>(rule: MergeRule, seq: &mut S, cmp: F)
where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    let mut buffer = MergeBuffer::new();
    let len = seq.len();
    sort_sequence_range_with_buffer(rule, seq, 0, len, cmp, &mut buffer);
}

/// Fully general entry point: explicit rule, range, and reusable scratch.
///
/// The buffer grows on demand and keeps its capacity between calls, so a
/// caller sorting many sequences can pay for scratch allocation once.
///
/// Panics if `first > last` or `last > seq.len()`, before moving anything.
pub fn sort_sequence_range_with_buffer<S, F>(
    rule: MergeRule,
    seq: &mut S,
    first: usize,
    last: usize,
    mut cmp: F,
    buffer: &mut MergeBuffer<S::Item>,
) where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    assert!(
        first <= last && last <= seq.len(),
        "invalid sort range {first}..{last} for sequence of length {}",
        seq.len()
    );
    engine::sort_range(rule, seq, first, last, &mut cmp, buffer);
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn assert_sorts_like_std(data: &[u64]) {
        for &rule in all_rules() {
            let mut actual = data.to_vec();
            sort_with(rule, &mut actual, u64::cmp);

            let mut expected = data.to_vec();
            expected.sort_unstable();

            assert_eq!(
                actual,
                expected,
                "rule={} input_len={}",
                rule_name(rule),
                data.len(),
            );
        }
    }

    #[test]
    fn rule_names_are_unique() {
        let mut seen = HashSet::new();
        for &rule in all_rules() {
            assert!(seen.insert(rule_name(rule)));
        }
    }

    #[test]
    fn default_rule_is_the_ratio_invariant() {
        assert_eq!(MergeRule::default(), MergeRule::RatioInvariant);
    }

    #[test]
    fn small_mixed_input_with_duplicates() {
        let mut data = [5_u64, 3, 8, 3, 1];
        sort(&mut data);
        assert_eq!(data, [1, 3, 3, 5, 8]);
    }

    #[test]
    fn duplicates_keep_their_input_order() {
        // Same keys as above, tagged with input positions.
        let mut data = [(5_u32, 0_u32), (3, 1), (8, 2), (3, 3), (1, 4)];
        sort_by(&mut data, |a, b| a.0.cmp(&b.0));
        assert_eq!(data, [(1, 4), (3, 1), (3, 3), (5, 0), (8, 2)]);
    }

    #[test]
    fn stability_holds_at_merge_scale() {
        let mut rng = StdRng::seed_from_u64(0x57AB_1E);
        for &rule in all_rules() {
            // Few distinct keys force plenty of cross-run ties.
            let mut data: Vec<(u32, u32)> = (0..5_000)
                .map(|i| (rng.random_range(0..8_u32), i))
                .collect();
            let mut expected = data.clone();
            expected.sort_by_key(|&(key, _)| key);

            sort_with(rule, &mut data, |a, b| a.0.cmp(&b.0));
            assert_eq!(data, expected, "rule={}", rule_name(rule));
        }
    }

    #[test]
    fn edge_cases() {
        let cases = [
            vec![],
            vec![42],
            vec![1, 2, 3, 4, 5, 6],
            vec![6, 5, 4, 3, 2, 1],
            vec![7; 128],
            vec![u64::MIN, 1, u64::MAX, 0, u64::MAX - 1, 2],
            vec![5, 5, 3, 3, 1, 1, 4, 4, 2, 2, 0, 0],
        ];

        for case in &cases {
            assert_sorts_like_std(case);
        }
    }

    #[test]
    fn sorted_input_is_returned_unchanged() {
        let mut data: Vec<u64> = (0..1_000).collect();
        let expected = data.clone();
        for &rule in all_rules() {
            sort_with(rule, &mut data, u64::cmp);
            assert_eq!(data, expected);
        }
    }

    #[test]
    fn descending_input_of_a_thousand() {
        for &rule in all_rules() {
            let mut data: Vec<u64> = (0..1_000).rev().collect();
            sort_with(rule, &mut data, u64::cmp);
            assert_eq!(data, (0..1_000).collect::<Vec<_>>());
        }
    }

    #[test]
    fn short_trailing_run_is_padded_and_merged() {
        // A 53-element ascending prefix followed by a longer ascending block
        // starting lower, so the split lands awkwardly mid-run.
        let mut data: Vec<u64> = (1..=53).chain(27..=100).collect();
        let mut expected = data.clone();
        expected.sort_unstable();
        for &rule in all_rules() {
            let mut actual = data.clone();
            sort_with(rule, &mut actual, u64::cmp);
            assert_eq!(actual, expected, "rule={}", rule_name(rule));
        }
        sort(&mut data);
        assert_eq!(data, expected);
    }

    #[test]
    fn fixed_seed_random_cases() {
        let mut rng = StdRng::seed_from_u64(0x5EED_2026);
        for &size in &[2_usize, 3, 8, 31, 32, 63, 64, 127, 128, 511, 2048, 10_000] {
            let mut data = Vec::with_capacity(size);
            for _ in 0..size {
                data.push(rng.random::<u64>());
            }
            assert_sorts_like_std(&data);
        }
    }

    #[test]
    fn seeded_trials_cross_check_permutation() {
        // Many smaller seeded trials in place of one enormous batch.
        for trial in 0..200_u64 {
            let mut rng = StdRng::seed_from_u64(0xC0FFEE ^ trial);
            let size = rng.random_range(1..=2_000);
            let data: Vec<u64> = (0..size).map(|_| rng.random_range(0..500)).collect();
            assert_sorts_like_std(&data);
        }
    }

    #[test]
    fn fixed_seed_many_duplicates() {
        let mut rng = StdRng::seed_from_u64(0xD0D1_2026);
        for &size in &[64_usize, 1024, 4096] {
            let mut data = Vec::with_capacity(size);
            for _ in 0..size {
                data.push((rng.random::<u64>() % 16) * 17);
            }
            assert_sorts_like_std(&data);
        }
    }

    #[test]
    fn organ_pipe_and_sawtooth_patterns() {
        let organ: Vec<u64> = (0..500).chain((0..500).rev()).collect();
        let sawtooth: Vec<u64> = (0..2_000).map(|i| (i % 64) as u64).collect();
        assert_sorts_like_std(&organ);
        assert_sorts_like_std(&sawtooth);
    }

    #[test]
    fn range_sort_touches_only_the_range() {
        let mut data: Vec<u64> = vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0];
        sort_range_with(MergeRule::BoundaryPower, &mut data, 2, 8, u64::cmp);
        assert_eq!(data, vec![9, 8, 2, 3, 4, 5, 6, 7, 1, 0]);
    }

    #[test]
    fn empty_range_is_a_no_op() {
        let mut data: Vec<u64> = vec![3, 1, 2];
        sort_range_with(MergeRule::RatioInvariant, &mut data, 1, 1, u64::cmp);
        assert_eq!(data, vec![3, 1, 2]);
    }

    #[test]
    #[should_panic(expected = "invalid sort range")]
    fn reversed_bounds_panic() {
        let mut data: Vec<u64> = vec![1, 2, 3];
        sort_range_with(MergeRule::RatioInvariant, &mut data, 2, 1, u64::cmp);
    }

    #[test]
    #[should_panic(expected = "invalid sort range")]
    fn out_of_bounds_end_panics() {
        let mut data: Vec<u64> = vec![1, 2, 3];
        sort_range_with(MergeRule::RatioInvariant, &mut data, 0, 4, u64::cmp);
    }

    #[test]
    fn comparator_can_invert_the_order() {
        let mut data: Vec<u64> = vec![3, 1, 4, 1, 5, 9, 2, 6];
        sort_by(&mut data, |a, b| b.cmp(a));
        assert_eq!(data, vec![9, 6, 5, 4, 3, 2, 1, 1]);
    }

    struct Backwards(Vec<u32>);

    // Stores its elements in reverse; sorting through the trait must still
    // produce ascending logical order.
    impl Sequence for Backwards {
        type Item = u32;

        fn len(&self) -> usize {
            self.0.len()
        }

        fn get(&self, index: usize) -> u32 {
            self.0[self.0.len() - 1 - index]
        }

        fn set(&mut self, index: usize, value: u32) {
            let last = self.0.len() - 1;
            self.0[last - index] = value;
        }
    }

    #[test]
    fn custom_sequence_sorts_through_the_trait() {
        let mut rng = StdRng::seed_from_u64(0xBAC_4A2D);
        let values: Vec<u32> = (0..3_000).map(|_| rng.random()).collect();
        let mut seq = Backwards(values.clone());
        sort_sequence_with(MergeRule::BoundaryPower, &mut seq, u32::cmp);

        let logical: Vec<u32> = (0..seq.len()).map(|i| seq.get(i)).collect();
        let mut expected = values;
        expected.sort_unstable();
        assert_eq!(logical, expected);
    }

    #[test]
    fn buffer_reuse_across_sorts() {
        let mut rng = StdRng::seed_from_u64(0x0B0F_F3);
        let mut buffer = MergeBuffer::new();
        for _ in 0..5 {
            let mut data: Vec<u64> = (0..4_096).map(|_| rng.random()).collect();
            let len = data.len();
            sort_sequence_range_with_buffer(
                MergeRule::RatioInvariant,
                &mut data,
                0,
                len,
                u64::cmp,
                &mut buffer,
            );
            assert!(data.is_sorted());
        }
        assert!(buffer.capacity() <= 2_048);
    }

    #[test]
    fn both_rules_agree_element_for_element() {
        let mut rng = StdRng::seed_from_u64(0xA6EE_2026);
        for _ in 0..20 {
            let size = rng.random_range(100..5_000);
            let data: Vec<(u32, u32)> = (0..size).map(|i| (rng.random_range(0..50), i)).collect();

            let mut ratio = data.clone();
            sort_with(MergeRule::RatioInvariant, &mut ratio, |a, b| a.0.cmp(&b.0));
            let mut power = data.clone();
            sort_with(MergeRule::BoundaryPower, &mut power, |a, b| a.0.cmp(&b.0));

            // Stability makes the result unique, whatever the merge order.
            assert_eq!(ratio, power);
        }
    }
}
