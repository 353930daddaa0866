//! A contiguous growable array with hand-managed storage.
//!
//! [`GrowArr`] keeps its elements in a single heap block that it allocates,
//! grows and releases itself. Growth doubles the capacity, element
//! lifetimes are tracked independently of the block, and copies and moves
//! each have a single, documented ownership policy.
//!
//! Storage events (allocation, growth, release) are reported through the
//! [`log`](https://docs.rs/log) facade at `trace` level.

mod growarr;

pub(crate) mod errors;

pub use errors::{AllocErr, EmptyError, IndexError};
pub use growarr::{GrowArr, IntoIter};
