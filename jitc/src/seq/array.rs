//! Contiguous sequence without slack capacity.
use std::mem;

use super::{SeqError, SeqResult, Sequence};

/// Array backed [`Sequence`].
///
/// The backing store is a boxed slice, so its capacity is exactly the
/// number of occupied slots. Every push grows it by one slot and every pop
/// shrinks it by one slot, relocating the elements each time.
///
/// This trades allocation frequency for zero wasted capacity, which pays
/// off when the allocator hands out whole pages and growing in place is
/// usually possible.
#[derive(Debug)]
pub struct ArraySeq<T> {
    slots: Box<[T]>,
}

impl<T> ArraySeq<T> {
    pub fn new() -> Self {
        Self {
            slots: Box::default(),
        }
    }

    /// Number of slots in the backing store.
    ///
    /// Always equal to [`len`](Sequence::len).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Resize the store by exactly one slot, in either direction, while
    /// the elements are held in a `Vec`.
    fn resize_with<R>(&mut self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let mut slots = mem::take(&mut self.slots).into_vec();
        let result = f(&mut slots);
        // Shrinks the allocation to fit when it was grown beyond one slot.
        self.slots = slots.into_boxed_slice();
        result
    }
}

impl<T> Default for ArraySeq<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Sequence<T> for ArraySeq<T> {
    /// O(n) because the store is relocated to make room for one more slot.
    fn push(&mut self, elem: T) {
        self.resize_with(|slots| {
            slots.reserve_exact(1);
            slots.push(elem);
        })
    }

    /// O(n) because the store is relocated to release the last slot.
    fn pop(&mut self) -> SeqResult<T> {
        if self.slots.is_empty() {
            return Err(SeqError::Empty);
        }
        self.resize_with(|slots| slots.pop().ok_or(SeqError::Empty))
    }

    /// O(1) direct indexing.
    ///
    /// Index 0 is reserved and always out of range, so valid indices are
    /// `1..len`. The first pushed element is only reachable by popping or
    /// iterating.
    fn access(&self, index: usize) -> SeqResult<&T> {
        if index == 0 || index >= self.slots.len() {
            return Err(SeqError::OutOfRange {
                index,
                len: self.slots.len(),
            });
        }
        Ok(&self.slots[index])
    }

    #[inline]
    fn len(&self) -> usize {
        self.slots.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.slots.iter())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_capacity_tracks_len() {
        let mut seq = ArraySeq::new();
        assert_eq!(seq.capacity(), 0);

        for n in 0..8 {
            seq.push(n);
            assert_eq!(seq.capacity(), seq.len());
        }
        while seq.pop().is_ok() {
            assert_eq!(seq.capacity(), seq.len());
        }
        assert_eq!(seq.capacity(), 0);
    }

    #[test]
    fn test_access_bounds() {
        let mut seq = ArraySeq::new();
        seq.push('a');
        seq.push('b');
        seq.push('c');

        assert_eq!(seq.access(0), Err(SeqError::OutOfRange { index: 0, len: 3 }));
        assert_eq!(seq.access(1), Ok(&'b'));
        assert_eq!(seq.access(2), Ok(&'c'));
        assert_eq!(seq.access(3), Err(SeqError::OutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn test_pop_empty() {
        let mut seq = ArraySeq::<u8>::new();
        assert_eq!(seq.pop(), Err(SeqError::Empty));
        assert_eq!(seq.capacity(), 0);
    }
}
