//! Reusable scratch storage for merges.

use crate::sequence::Sequence;

/// Scratch space owned by one in-flight sort call.
///
/// A merge buffers only the smaller of the two runs being joined, so the
/// high-water capacity over a whole sort never exceeds half the input.
/// The buffer grows on demand, never shrinks, and can be handed to many
/// consecutive sorts through the explicit-buffer entry points.
#[derive(Debug)]
pub struct MergeBuffer<T> {
    data: Vec<T>,
}

impl<T> MergeBuffer<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Elements of scratch capacity currently reserved.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }
}

impl<T> Default for MergeBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> MergeBuffer<T> {
    /// Fill the buffer with `seq[start..start + len]` and return it.
    ///
    /// Capacity is secured before the first element is copied, so a failed
    /// grow leaves the sequence untouched. `reserve_exact` keeps the
    /// capacity at the high-water run length instead of doubling past it.
    pub(crate) fn load<S>(&mut self, seq: &S, start: usize, len: usize) -> &[T]
    where
        S: Sequence<Item = T> + ?Sized,
    {
        self.data.clear();
        if self.data.capacity() < len {
            self.data.reserve_exact(len);
        }
        self.data.extend((start..start + len).map(|i| seq.get(i)));
        &self.data
    }
}
