//! Galloping merge of two adjacent sorted runs.
//!
//! A merge buffers only the smaller run, then alternates between linear
//! one-comparison-per-element merging and a galloping mode that locates
//! whole winning stretches with exponential-then-binary search and copies
//! them in bulk. The switchover threshold adapts to the data: inputs that
//! keep producing long streaks drive it down, noisy inputs push it back up.

use std::cmp::Ordering;

use crate::buffer::MergeBuffer;
use crate::runs::RunStack;
use crate::sequence::Sequence;

/// Initial number of consecutive single-side wins before switching to
/// galloping mode. Tuned constant from the classic listsort analysis.
pub(crate) const MIN_GALLOP: usize = 7;

/// Adaptive gallop threshold, carried across every merge of one sort call.
pub(crate) struct GallopState {
    pub min_gallop: usize,
}

impl GallopState {
    pub fn new() -> Self {
        Self {
            min_gallop: MIN_GALLOP,
        }
    }
}

/// Leftmost insertion point of `key` in the sorted window `at(0..len)`: the
/// smallest `k` with `at(k) >= key`. Probing starts at `hint` and doubles
/// outward before the binary search, so a nearby answer costs O(log d)
/// comparisons for distance d.
pub(crate) fn gallop_left<T, A, F>(key: T, at: A, len: usize, hint: usize, cmp: &mut F) -> usize
where
    T: Copy,
    A: Fn(usize) -> T,
    F: FnMut(&T, &T) -> Ordering,
{
    debug_assert!(hint < len);
    let mut lo;
    let mut hi;

    if cmp(&key, &at(hint)) == Ordering::Greater {
        // Gallop right until at(hint + last_ofs) < key <= at(hint + ofs).
        let max_ofs = len - hint;
        let mut last_ofs = 0;
        let mut ofs = 1;
        while ofs < max_ofs && cmp(&key, &at(hint + ofs)) == Ordering::Greater {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        ofs = ofs.min(max_ofs);
        lo = hint + last_ofs + 1;
        hi = hint + ofs;
    } else {
        // Gallop left until at(hint - ofs) < key <= at(hint - last_ofs).
        let max_ofs = hint + 1;
        let mut last_ofs = 0;
        let mut ofs = 1;
        while ofs < max_ofs && cmp(&key, &at(hint - ofs)) != Ordering::Greater {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        ofs = ofs.min(max_ofs);
        lo = hint + 1 - ofs;
        hi = hint - last_ofs;
    }

    while lo < hi {
        let mid = lo + ((hi - lo) >> 1);
        if cmp(&key, &at(mid)) == Ordering::Greater {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Rightmost insertion point of `key`: the smallest `k` with `at(k) > key`.
pub(crate) fn gallop_right<T, A, F>(key: T, at: A, len: usize, hint: usize, cmp: &mut F) -> usize
where
    T: Copy,
    A: Fn(usize) -> T,
    F: FnMut(&T, &T) -> Ordering,
{
    debug_assert!(hint < len);
    let mut lo;
    let mut hi;

    if cmp(&key, &at(hint)) == Ordering::Less {
        // Gallop left until at(hint - ofs) <= key < at(hint - last_ofs).
        let max_ofs = hint + 1;
        let mut last_ofs = 0;
        let mut ofs = 1;
        while ofs < max_ofs && cmp(&key, &at(hint - ofs)) == Ordering::Less {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        ofs = ofs.min(max_ofs);
        lo = hint + 1 - ofs;
        hi = hint - last_ofs;
    } else {
        // Gallop right until at(hint + last_ofs) <= key < at(hint + ofs).
        let max_ofs = len - hint;
        let mut last_ofs = 0;
        let mut ofs = 1;
        while ofs < max_ofs && cmp(&key, &at(hint + ofs)) != Ordering::Less {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        ofs = ofs.min(max_ofs);
        lo = hint + last_ofs + 1;
        hi = hint + ofs;
    }

    while lo < hi {
        let mid = lo + ((hi - lo) >> 1);
        if cmp(&key, &at(mid)) == Ordering::Less {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

/// Merge stack entries `index` and `index + 1` in the sequence.
///
/// The already-placed prefix of the left run and suffix of the right run are
/// galloped over first; the remainder is merged buffering whichever side is
/// smaller.
pub(crate) fn merge_at<S, F>(
    seq: &mut S,
    stack: &mut RunStack,
    index: usize,
    buffer: &mut MergeBuffer<S::Item>,
    gallop: &mut GallopState,
    cmp: &mut F,
) where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    let left = stack.run(index);
    let right = stack.run(index + 1);
    debug_assert!(left.len > 0 && right.len > 0);
    debug_assert_eq!(left.end(), right.start);
    stack.fuse(index);

    let mut base1 = left.start;
    let mut len1 = left.len;
    let base2 = right.start;
    let mut len2 = right.len;

    // Skip the prefix of run1 that already precedes all of run2.
    let first_right = seq.get(base2);
    let skip = gallop_right(first_right, |i| seq.get(base1 + i), len1, 0, cmp);
    base1 += skip;
    len1 -= skip;
    if len1 == 0 {
        return;
    }

    // Drop the suffix of run2 that already follows all of run1.
    let last_left = seq.get(base1 + len1 - 1);
    len2 = gallop_left(last_left, |i| seq.get(base2 + i), len2, len2 - 1, cmp);
    if len2 == 0 {
        return;
    }

    if len1 <= len2 {
        merge_lo(seq, base1, len1, base2, len2, buffer, gallop, cmp);
    } else {
        merge_hi(seq, base1, len1, base2, len2, buffer, gallop, cmp);
    }
}

/// Forward merge with run1 buffered; requires `len1 <= len2`.
///
/// Ties take the buffered (left) element, so equal keys keep input order.
fn merge_lo<S, F>(
    seq: &mut S,
    base1: usize,
    len1: usize,
    base2: usize,
    len2: usize,
    buffer: &mut MergeBuffer<S::Item>,
    gallop: &mut GallopState,
    cmp: &mut F,
) where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    debug_assert!(len1 >= 1 && len1 <= len2);
    debug_assert_eq!(base1 + len1, base2);
    let tmp = buffer.load(seq, base1, len1);

    let mut i = 0; // cursor into tmp
    let mut j = base2; // cursor into run2
    let mut dest = base1;
    let end2 = base2 + len2;

    // Pre-trim guarantees run2's head is the overall minimum.
    seq.set(dest, seq.get(j));
    dest += 1;
    j += 1;
    if j == end2 {
        copy_from_buf(seq, tmp, 0, dest, len1);
        return;
    }
    if len1 == 1 {
        copy_forward(seq, j, dest, end2 - j);
        seq.set(dest + (end2 - j), tmp[0]);
        return;
    }

    let mut min_gallop = gallop.min_gallop;
    'outer: loop {
        let mut count1 = 0_usize;
        let mut count2 = 0_usize;

        // Linear mode: one comparison per element until a side streaks.
        loop {
            if cmp(&seq.get(j), &tmp[i]) == Ordering::Less {
                seq.set(dest, seq.get(j));
                dest += 1;
                j += 1;
                count2 += 1;
                count1 = 0;
                if j == end2 {
                    break 'outer;
                }
            } else {
                seq.set(dest, tmp[i]);
                dest += 1;
                i += 1;
                count1 += 1;
                count2 = 0;
                if i == len1 - 1 {
                    break 'outer;
                }
            }
            if count1 >= min_gallop || count2 >= min_gallop {
                break;
            }
        }

        // Galloping mode: bulk-copy whole winning stretches.
        loop {
            count1 = gallop_right(seq.get(j), |k| tmp[i + k], len1 - i, 0, cmp);
            if count1 != 0 {
                copy_from_buf(seq, tmp, i, dest, count1);
                dest += count1;
                i += count1;
                if i >= len1 - 1 {
                    break 'outer;
                }
            }
            seq.set(dest, seq.get(j));
            dest += 1;
            j += 1;
            if j == end2 {
                break 'outer;
            }

            count2 = gallop_left(tmp[i], |k| seq.get(j + k), end2 - j, 0, cmp);
            if count2 != 0 {
                copy_forward(seq, j, dest, count2);
                dest += count2;
                j += count2;
                if j == end2 {
                    break 'outer;
                }
            }
            seq.set(dest, tmp[i]);
            dest += 1;
            i += 1;
            if i == len1 - 1 {
                break 'outer;
            }

            min_gallop = min_gallop.saturating_sub(1);
            if count1 < MIN_GALLOP && count2 < MIN_GALLOP {
                // Streaks fell off; penalize and go back to linear mode.
                min_gallop += 2;
                break;
            }
        }
    }
    gallop.min_gallop = min_gallop.max(1);

    if i == len1 - 1 {
        // The last buffered element caps whatever remains of run2.
        let rest = end2 - j;
        copy_forward(seq, j, dest, rest);
        seq.set(dest + rest, tmp[i]);
    } else {
        // Run2 exhausted; the buffered tail is already in order.
        debug_assert_eq!(j, end2);
        copy_from_buf(seq, tmp, i, dest, len1 - i);
    }
}

/// Backward merge with run2 buffered; requires `len1 > len2`.
///
/// Merging back to front takes the larger element first; ties go to the
/// buffered (right) side so that, read forward, left still wins on equality.
fn merge_hi<S, F>(
    seq: &mut S,
    base1: usize,
    len1: usize,
    base2: usize,
    len2: usize,
    buffer: &mut MergeBuffer<S::Item>,
    gallop: &mut GallopState,
    cmp: &mut F,
) where
    S: Sequence + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    debug_assert!(len2 >= 1 && len1 > len2);
    debug_assert_eq!(base1 + len1, base2);
    let tmp = buffer.load(seq, base2, len2);

    // Unmerged tails: seq[base1..base1 + rem1] and tmp[..rem2]. The next
    // write slot, filled back to front, is base1 + rem1 + rem2 - 1.
    let mut rem1 = len1;
    let mut rem2 = len2;

    // Pre-trim guarantees run1's tail is the overall maximum.
    seq.set(base1 + rem1 + rem2 - 1, seq.get(base1 + rem1 - 1));
    rem1 -= 1;
    if rem1 == 0 {
        copy_from_buf(seq, tmp, 0, base1, rem2);
        return;
    }
    if rem2 == 1 {
        copy_backward(seq, base1, base1 + 1, rem1);
        seq.set(base1, tmp[0]);
        return;
    }

    let mut min_gallop = gallop.min_gallop;
    'outer: loop {
        let mut count1 = 0_usize;
        let mut count2 = 0_usize;

        loop {
            if cmp(&tmp[rem2 - 1], &seq.get(base1 + rem1 - 1)) == Ordering::Less {
                seq.set(base1 + rem1 + rem2 - 1, seq.get(base1 + rem1 - 1));
                rem1 -= 1;
                count1 += 1;
                count2 = 0;
                if rem1 == 0 {
                    break 'outer;
                }
            } else {
                seq.set(base1 + rem1 + rem2 - 1, tmp[rem2 - 1]);
                rem2 -= 1;
                count2 += 1;
                count1 = 0;
                if rem2 == 1 {
                    break 'outer;
                }
            }
            if count1 >= min_gallop || count2 >= min_gallop {
                break;
            }
        }

        loop {
            count1 =
                rem1 - gallop_right(tmp[rem2 - 1], |k| seq.get(base1 + k), rem1, rem1 - 1, cmp);
            if count1 != 0 {
                copy_backward(
                    seq,
                    base1 + rem1 - count1,
                    base1 + rem1 - count1 + rem2,
                    count1,
                );
                rem1 -= count1;
                if rem1 == 0 {
                    break 'outer;
                }
            }
            seq.set(base1 + rem1 + rem2 - 1, tmp[rem2 - 1]);
            rem2 -= 1;
            if rem2 == 1 {
                break 'outer;
            }

            count2 = rem2 - gallop_left(seq.get(base1 + rem1 - 1), |k| tmp[k], rem2, rem2 - 1, cmp);
            if count2 != 0 {
                copy_from_buf(seq, tmp, rem2 - count2, base1 + rem1 + rem2 - count2, count2);
                rem2 -= count2;
                if rem2 <= 1 {
                    break 'outer;
                }
            }
            seq.set(base1 + rem1 + rem2 - 1, seq.get(base1 + rem1 - 1));
            rem1 -= 1;
            if rem1 == 0 {
                break 'outer;
            }

            min_gallop = min_gallop.saturating_sub(1);
            if count1 < MIN_GALLOP && count2 < MIN_GALLOP {
                min_gallop += 2;
                break;
            }
        }
    }
    gallop.min_gallop = min_gallop.max(1);

    if rem2 == 1 {
        debug_assert!(rem1 > 0);
        copy_backward(seq, base1, base1 + 1, rem1);
        seq.set(base1, tmp[0]);
    } else if rem2 > 1 {
        // Run1 exhausted; the buffered prefix drops straight into place.
        debug_assert_eq!(rem1, 0);
        copy_from_buf(seq, tmp, 0, base1, rem2);
    }
    // rem2 == 0: everything already sits in position.
}

fn copy_from_buf<S>(seq: &mut S, buf: &[S::Item], from: usize, dest: usize, n: usize)
where
    S: Sequence + ?Sized,
{
    for k in 0..n {
        seq.set(dest + k, buf[from + k]);
    }
}

/// Overlapping forward copy; only valid for `dest <= src`.
fn copy_forward<S>(seq: &mut S, src: usize, dest: usize, n: usize)
where
    S: Sequence + ?Sized,
{
    debug_assert!(dest <= src);
    for k in 0..n {
        seq.set(dest + k, seq.get(src + k));
    }
}

/// Overlapping backward copy; only valid for `dest >= src`.
fn copy_backward<S>(seq: &mut S, src: usize, dest: usize, n: usize)
where
    S: Sequence + ?Sized,
{
    debug_assert!(dest >= src);
    for k in (0..n).rev() {
        seq.set(dest + k, seq.get(src + k));
    }
}
