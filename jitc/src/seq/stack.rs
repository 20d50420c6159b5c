//! Linked sequence with LIFO access.
use super::{SeqError, SeqResult, Sequence};

/// Chain backed [`Sequence`].
///
/// Each node owns the node pushed before it, so the chain is released
/// together with its top.
#[derive(Debug)]
pub struct StackSeq<T> {
    top: Option<Box<Node<T>>>,
    len: usize,
}

#[derive(Debug)]
struct Node<T> {
    elem: T,
    prev: Option<Box<Node<T>>>,
}

impl<T> StackSeq<T> {
    pub fn new() -> Self {
        Self { top: None, len: 0 }
    }

    /// Most recently pushed element.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.top.as_deref().map(|node| &node.elem)
    }

    /// Walk the chain from the top down.
    fn nodes(&self) -> impl Iterator<Item = &Node<T>> {
        std::iter::successors(self.top.as_deref(), |node| node.prev.as_deref())
    }
}

impl<T> Default for StackSeq<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for StackSeq<T> {
    fn drop(&mut self) {
        // Unlink iteratively; the default drop recurses once per node.
        let mut next = self.top.take();
        while let Some(mut node) = next {
            next = node.prev.take();
        }
    }
}

impl<T> Sequence<T> for StackSeq<T> {
    /// O(1), the new element becomes the top.
    fn push(&mut self, elem: T) {
        let prev = self.top.take();
        self.top = Some(Box::new(Node { elem, prev }));
        self.len += 1;
    }

    /// O(1), detaches the top.
    fn pop(&mut self) -> SeqResult<T> {
        let node = self.top.take().ok_or(SeqError::Empty)?;
        let Node { elem, prev } = *node;
        self.top = prev;
        self.len -= 1;
        Ok(elem)
    }

    /// O(index), walks back from the top.
    ///
    /// Index 0 is the top element, so valid indices are `0..len`.
    fn access(&self, index: usize) -> SeqResult<&T> {
        if index >= self.len {
            return Err(SeqError::OutOfRange {
                index,
                len: self.len,
            });
        }
        self.nodes()
            .nth(index)
            .map(|node| &node.elem)
            .ok_or(SeqError::OutOfRange {
                index,
                len: self.len,
            })
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    /// The chain only links backwards, so the nodes are collected first
    /// to yield them oldest first.
    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        let mut elems = self.nodes().map(|node| &node.elem).collect::<Vec<_>>();
        elems.reverse();
        Box::new(elems.into_iter())
    }
}
