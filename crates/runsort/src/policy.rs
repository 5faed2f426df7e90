//! Merge-order policies for the pending-run stack.

use crate::runs::{Run, RunStack};

/// Decides which pending runs must merge, and when.
///
/// Both implementations bound the stack to O(log n) entries and the total
/// merge cost to O(n log n); the boundary-power policy is additionally
/// optimal up to lower-order terms in the entropy of the run profile.
pub(crate) trait MergeOrderPolicy {
    /// Record a freshly detected run on the stack.
    fn on_push(&mut self, stack: &mut RunStack, start: usize, len: usize);

    /// Left index of the adjacent pair that must merge now to restore the
    /// policy invariant, if any.
    fn should_collapse(&self, stack: &RunStack) -> Option<usize>;

    /// Left index of the pair to merge while draining the stack at the end.
    fn force_collapse_index(&self, stack: &RunStack) -> usize {
        stack.len() - 2
    }
}

/// Length-ratio invariant: keeps `len[i-2] > len[i-1] + len[i]` and
/// `len[i-1] > len[i]` near the top of the stack, so entry sizes grow at
/// least as fast as Fibonacci numbers.
pub(crate) struct RatioInvariant;

impl MergeOrderPolicy for RatioInvariant {
    fn on_push(&mut self, stack: &mut RunStack, start: usize, len: usize) {
        stack.push(Run { start, len, power: 0 });
    }

    fn should_collapse(&self, stack: &RunStack) -> Option<usize> {
        let n = stack.len();
        if n < 2 {
            return None;
        }
        let top = stack.run(n - 1).len;
        let second = stack.run(n - 2).len;

        // The second guard repairs stacks where a merge re-broke the
        // invariant one slot further down.
        let third_violated = n >= 3 && stack.run(n - 3).len <= second + top;
        let fourth_violated = n >= 4 && stack.run(n - 4).len <= stack.run(n - 3).len + second;

        if third_violated || fourth_violated {
            // Merge the middle run into its smaller neighbor.
            if n >= 3 && stack.run(n - 3).len < top {
                Some(n - 3)
            } else {
                Some(n - 2)
            }
        } else if second <= top {
            Some(n - 2)
        } else {
            None
        }
    }

    fn force_collapse_index(&self, stack: &RunStack) -> usize {
        let n = stack.len();
        if n >= 3 && stack.run(n - 3).len < stack.run(n - 1).len {
            n - 3
        } else {
            n - 2
        }
    }
}

/// Boundary-power invariant (powersort): every run records the merge-tree
/// depth of its left boundary, and boundaries deeper than a newly arrived
/// one collapse before the new run settles on top of them.
pub(crate) struct BoundaryPower {
    /// Start of the range being sorted; powers are relative to it.
    base: usize,
    /// Length of the range being sorted; midpoint normalization divisor.
    total: usize,
}

impl BoundaryPower {
    pub fn new(base: usize, total: usize) -> Self {
        Self { base, total }
    }
}

impl MergeOrderPolicy for BoundaryPower {
    fn on_push(&mut self, stack: &mut RunStack, start: usize, len: usize) {
        // Computed once per run; intermediate merges below never change it.
        let power = match stack.last() {
            Some(top) => node_power(
                top.start - self.base,
                top.end() - self.base,
                start - self.base,
                start + len - self.base,
                self.total,
            ),
            None => 0,
        };
        stack.push(Run { start, len, power });
    }

    fn should_collapse(&self, stack: &RunStack) -> Option<usize> {
        let n = stack.len();
        // The freshly pushed run stays on top; the pair below it merges
        // while its recorded boundary outranks the new boundary.
        if n >= 3 && stack.run(n - 2).power > stack.run(n - 1).power {
            Some(n - 3)
        } else {
            None
        }
    }
}

/// Depth in the balanced binary partition of `[0, n)` at which the midpoints
/// of two adjacent runs `[s1, e1)` and `[s2, e2)` first diverge.
///
/// Midpoints are left doubled (`s + e`) and normalized to a 2^63 fixed-point
/// scale; the `u128` intermediates keep the shift of a value up to `2n` from
/// overflowing. Equal fixed-point midpoints cap at 64, forcing an immediate
/// merge whenever that boundary is compared.
pub(crate) fn node_power(s1: usize, e1: usize, s2: usize, e2: usize, n: usize) -> u32 {
    debug_assert!(s1 < e1 && e1 == s2 && s2 < e2 && e2 <= n);
    let a = ((s1 as u128 + e1 as u128) << 63) / n as u128;
    let b = ((s2 as u128 + e2 as u128) << 63) / n as u128;
    let diff = (a as u64) ^ (b as u64);
    if diff == 0 { 64 } else { diff.leading_zeros() + 1 }
}
