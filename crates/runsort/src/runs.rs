//! Run detection, extension, and the pending-run stack.

use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::sequence::Sequence;

/// Merge threshold: ranges shorter than this are finished with a single
/// binary-insertion pass, and min-run sizing shifts against it.
pub(crate) const MIN_MERGE: usize = 32;

/// Inline capacity of the pending stack. Both merge-order policies keep the
/// stack at O(log n) entries, so this never spills to the heap for any
/// addressable input length.
const STACK_CAPACITY: usize = 96;

/// A pending ascending run `[start, start + len)`.
///
/// `power` is the merge-tree depth of the run's left boundary; only the
/// boundary-power policy reads it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Run {
    pub start: usize,
    pub len: usize,
    pub power: u32,
}

impl Run {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Stack of pending runs, leftmost run at index 0.
///
/// Entries are disjoint, adjacent, and cover exactly the processed prefix of
/// the range being sorted.
pub(crate) struct RunStack {
    runs: SmallVec<[Run; STACK_CAPACITY]>,
    peak: usize,
    merges: usize,
}

impl RunStack {
    pub fn new() -> Self {
        Self {
            runs: SmallVec::new(),
            peak: 0,
            merges: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn run(&self, index: usize) -> Run {
        self.runs[index]
    }

    pub fn last(&self) -> Option<Run> {
        self.runs.last().copied()
    }

    pub fn push(&mut self, run: Run) {
        self.runs.push(run);
        self.peak = self.peak.max(self.runs.len());
    }

    /// Replace runs `index` and `index + 1` with their concatenation.
    ///
    /// The merged run keeps the left run's boundary power.
    pub fn fuse(&mut self, index: usize) {
        debug_assert!(index + 1 < self.runs.len());
        debug_assert_eq!(self.runs[index].end(), self.runs[index + 1].start);
        self.runs[index].len += self.runs[index + 1].len;
        self.runs.remove(index + 1);
        self.merges += 1;
    }

    /// Deepest the stack has ever been.
    pub fn peak(&self) -> usize {
        self.peak
    }

    /// Merges performed so far.
    pub fn merges(&self) -> usize {
        self.merges
    }
}

/// Length of the maximal run starting at `lo`, normalized to ascending.
///
/// A strictly descending prefix is reversed in place with two-pointer swaps.
/// Equal neighbors stay in the ascending branch (`>=`); reversing a run that
/// contained equal elements would invert their relative order and break
/// stability.
pub(crate) fn detect_run<S, F>(seq: &mut S, lo: usize, hi: usize, cmp: &mut F) -> usize
where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    debug_assert!(lo < hi);
    let mut end = lo + 1;
    if end == hi {
        return 1;
    }

    if cmp(&seq.get(end), &seq.get(lo)) == Ordering::Less {
        end += 1;
        while end < hi && cmp(&seq.get(end), &seq.get(end - 1)) == Ordering::Less {
            end += 1;
        }
        let (mut a, mut b) = (lo, end - 1);
        while a < b {
            seq.swap(a, b);
            a += 1;
            b -= 1;
        }
    } else {
        end += 1;
        while end < hi && cmp(&seq.get(end), &seq.get(end - 1)) != Ordering::Less {
            end += 1;
        }
    }

    end - lo
}

/// Extend the sorted prefix `[lo, sorted_end)` to cover all of `[lo, hi)`
/// with a stable binary-insertion pass.
///
/// The upper-bound search (`first position comparing greater`) places each
/// key after existing equals, preserving input order.
pub(crate) fn extend_run<S, F>(seq: &mut S, lo: usize, hi: usize, sorted_end: usize, cmp: &mut F)
where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    debug_assert!(lo < sorted_end && sorted_end <= hi);
    for i in sorted_end..hi {
        let key = seq.get(i);

        let mut left = lo;
        let mut right = i;
        while left < right {
            let mid = left + ((right - left) >> 1);
            if cmp(&seq.get(mid), &key) == Ordering::Greater {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        let mut j = i;
        while j > left {
            seq.set(j, seq.get(j - 1));
            j -= 1;
        }
        seq.set(left, key);
    }
}

/// Minimum run length for a range of `n` elements, chosen so `n / min_run`
/// is close to, but not above, a power of two. Any dropped low bit rounds
/// the result up to avoid a pathological final partial run.
pub(crate) fn min_run_length(mut n: usize) -> usize {
    let mut r = 0_usize;
    while n >= MIN_MERGE {
        r |= n & 1;
        n >>= 1;
    }
    n + r
}
