//! Ordered sequences with interchangeable storage.
//!
//! Every intermediate structure in the pipeline is accumulated through the
//! [`Sequence`] trait. Two strategies implement it:
//!
//! - [`ArraySeq`] keeps a contiguous store whose capacity always equals its
//!   length. Pushing and popping relocate the store, so both are O(n), but
//!   no slack capacity is ever held.
//! - [`StackSeq`] keeps an owned chain of nodes. Pushing and popping are
//!   O(1), but indexing walks the chain from the top.
//!
//! Call sites hold a `Box<dyn Sequence<T>>` built by [`Storage::build`] and
//! never name the concrete strategy.
mod array;
mod stack;

use std::fmt;

pub use self::{array::ArraySeq, stack::StackSeq};

pub type SeqResult<T> = std::result::Result<T, SeqError>;

/// Growable, ordered collection of elements.
pub trait Sequence<T> {
    /// Append an element to the end of the sequence.
    fn push(&mut self, elem: T);

    /// Remove and return the most recently pushed element.
    fn pop(&mut self) -> SeqResult<T>;

    /// Element at the given index.
    ///
    /// Which indices are valid is decided by the storage strategy, see
    /// [`ArraySeq::access`] and [`StackSeq::access`].
    fn access(&self, index: usize) -> SeqResult<&T>;

    /// Number of elements in the sequence.
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Like [`access`](Sequence::access), but an out of range index is
    /// simply absent.
    #[inline]
    fn get(&self, index: usize) -> Option<&T> {
        self.access(index).ok()
    }

    /// Iterate the elements in the order they were pushed.
    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_>;
}

/// Storage strategy used to build a [`Sequence`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// Contiguous store without slack, see [`ArraySeq`].
    #[default]
    Array,
    /// Singly linked chain, see [`StackSeq`].
    Stack,
}

impl Storage {
    pub fn build<T: 'static>(self) -> Box<dyn Sequence<T>> {
        match self {
            Storage::Array => Box::new(ArraySeq::new()),
            Storage::Stack => Box::new(StackSeq::new()),
        }
    }
}

impl fmt::Display for Storage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Storage::Array => write!(f, "array"),
            Storage::Stack => write!(f, "stack"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeqError {
    /// Pop on a sequence without elements.
    Empty,
    /// Index outside the valid range of the storage strategy.
    OutOfRange { index: usize, len: usize },
}

impl fmt::Display for SeqError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SeqError::Empty => write!(f, "sequence is empty"),
            SeqError::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for sequence of length {len}")
            }
        }
    }
}

impl std::error::Error for SeqError {}
