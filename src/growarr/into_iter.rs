use std::{fmt, iter::FusedIterator};

use super::{raw_buf::RawBuf, raw_iter::RawIter};


/// An iterator that moves elements out of a [`GrowArr`](crate::GrowArr).
///
/// Created by the `into_iter` method on `GrowArr` (provided by the
/// [`IntoIterator`] trait). Elements not yet yielded are dropped along with
/// the iterator, after which the storage block is released.
pub struct IntoIter<T> {
    // Field order matters: remaining elements are dropped before the block.
    iter: RawIter<T>,
    _buf: RawBuf<T>,
}

impl<T> IntoIter<T> {
    #[inline]
    pub(super) const fn new(buf: RawBuf<T>, iter: RawIter<T>) -> Self {
        Self { iter, _buf: buf }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> { self.iter.next() }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.iter.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> { self.iter.next_back() }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

#[cfg(not(tarpaulin_include))]
impl<T> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter").field("remaining", &self.iter.len()).finish()
    }
}
