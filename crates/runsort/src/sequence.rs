//! Random-access views the engine sorts through.

/// A mutable random-access sequence of copyable elements.
///
/// The engine touches elements only through this trait, so the same code
/// sorts plain slices, `Vec`s, or custom storage without raw-pointer views.
/// Implementations must provide O(1) positional access for the advertised
/// complexity bounds to hold.
pub trait Sequence {
    type Item: Copy;

    /// Number of elements.
    fn len(&self) -> usize;

    /// Element at `index`.
    fn get(&self, index: usize) -> Self::Item;

    /// Overwrite the element at `index`.
    fn set(&mut self, index: usize, value: Self::Item);

    /// Exchange the elements at `i` and `j`.
    fn swap(&mut self, i: usize, j: usize) {
        let tmp = self.get(i);
        self.set(i, self.get(j));
        self.set(j, tmp);
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Copy> Sequence for [T] {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, index: usize) -> T {
        self[index]
    }

    fn set(&mut self, index: usize, value: T) {
        self[index] = value;
    }

    fn swap(&mut self, i: usize, j: usize) {
        <[T]>::swap(self, i, j);
    }
}

impl<T: Copy> Sequence for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> T {
        self[index]
    }

    fn set(&mut self, index: usize, value: T) {
        self[index] = value;
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.as_mut_slice().swap(i, j);
    }
}
