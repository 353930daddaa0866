use std::alloc::{Layout, LayoutError};

use thiserror::Error;


/// Returned by [`GrowArr::pop`](crate::GrowArr::pop) when there is nothing
/// left to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("array is empty")]
pub struct EmptyError;

/// Returned by the checked accessors [`GrowArr::at`](crate::GrowArr::at) and
/// [`GrowArr::at_mut`](crate::GrowArr::at_mut) when `index >= len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("index {index} out of range for length {len}")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

/// Failure to size or obtain a storage block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocErr {
    #[error("capacity overflow")]
    Overflow,
    #[error("invalid layout for requested capacity")]
    Layout,
    #[error("allocation of {} bytes failed", .layout.size())]
    Alloc { layout: Layout }
}

impl AllocErr {
    #[inline]
    pub(crate) const fn layout(_err: LayoutError) -> Self { Self::Layout }

    #[inline]
    pub(crate) const fn alloc(layout: Layout) -> Self { Self::Alloc { layout } }
}
