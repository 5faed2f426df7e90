//! Top-level sort loop: detect runs, extend short ones, collapse per policy.

use std::cmp::Ordering;

use crate::MergeRule;
use crate::buffer::MergeBuffer;
use crate::merge::{self, GallopState};
use crate::policy::{BoundaryPower, MergeOrderPolicy, RatioInvariant};
use crate::runs::{self, RunStack, MIN_MERGE};
use crate::sequence::Sequence;

/// Diagnostics from one sort call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct EngineStats {
    /// Deepest the pending-run stack ever got.
    pub peak_pending: usize,
    /// Number of run merges performed.
    pub merges: usize,
}

/// Sort `seq[lo..hi]` under the given merge rule.
pub(crate) fn sort_range<S, F>(
    rule: MergeRule,
    seq: &mut S,
    lo: usize,
    hi: usize,
    cmp: &mut F,
    buffer: &mut MergeBuffer<S::Item>,
) -> EngineStats
where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    match rule {
        MergeRule::RatioInvariant => drive(seq, lo, hi, cmp, &mut RatioInvariant, buffer),
        MergeRule::BoundaryPower => {
            drive(seq, lo, hi, cmp, &mut BoundaryPower::new(lo, hi - lo), buffer)
        }
    }
}

fn drive<S, F, P>(
    seq: &mut S,
    lo: usize,
    hi: usize,
    cmp: &mut F,
    policy: &mut P,
    buffer: &mut MergeBuffer<S::Item>,
) -> EngineStats
where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
    P: MergeOrderPolicy,
{
    let n = hi - lo;
    if n < 2 {
        return EngineStats::default();
    }

    if n < MIN_MERGE {
        // Too short for merging; one detection plus a binary-insertion pass.
        let sorted = runs::detect_run(seq, lo, hi, cmp);
        if sorted < n {
            runs::extend_run(seq, lo, hi, lo + sorted, cmp);
        }
        return EngineStats::default();
    }

    let min_run = runs::min_run_length(n);
    let mut stack = RunStack::new();
    let mut gallop = GallopState::new();

    let mut start = lo;
    while start < hi {
        let mut run_len = runs::detect_run(seq, start, hi, cmp);
        if run_len < min_run {
            let forced = min_run.min(hi - start);
            runs::extend_run(seq, start, start + forced, start + run_len, cmp);
            run_len = forced;
        }

        policy.on_push(&mut stack, start, run_len);
        while let Some(index) = policy.should_collapse(&stack) {
            merge::merge_at(seq, &mut stack, index, buffer, &mut gallop, cmp);
        }

        start += run_len;
    }

    while stack.len() > 1 {
        let index = policy.force_collapse_index(&stack);
        merge::merge_at(seq, &mut stack, index, buffer, &mut gallop, cmp);
    }

    debug_assert_eq!(stack.run(0).start, lo);
    debug_assert_eq!(stack.run(0).len, n);
    EngineStats {
        peak_pending: stack.peak(),
        merges: stack.merges(),
    }
}
