
mod into_iter;
mod raw_buf;
mod raw_iter;

use std::{fmt, mem::{self, ManuallyDrop}, ops::{Deref, DerefMut, Index, IndexMut}, ptr, slice::{self, SliceIndex}};

use crate::errors::{AllocErr, EmptyError, IndexError};
pub use into_iter::IntoIter;
use raw_buf::{infallible, RawBuf};
use raw_iter::RawIter;

/// A contiguous growable array type.
///
/// `GrowArr` owns a single heap block holding `capacity` slots, of which the
/// first `len` hold live elements. Appending to a full array doubles its
/// capacity (`0 → 1 → 2 → 4 → …`), which keeps [`push`](Self::push) at
/// amortized *O*(1).
///
/// # Examples
///
/// ```
/// use growarr::GrowArr;
///
/// let mut arr = GrowArr::new();
/// arr.push(10);
/// arr.push(20);
/// arr.push(30);
///
/// assert_eq!(arr.len(), 3);
/// assert_eq!(arr.capacity(), 4);
///
/// assert_eq!(arr.pop(), Ok(30));
/// assert_eq!(arr[arr.len() - 1], 20);
///
/// arr[0] = 7;
/// assert_eq!(arr, [7, 20]);
/// ```
///
/// # Indexing
///
/// There are three ways to reach an element, differing in how an out of range
/// index is handled:
///
/// - [`at`](Self::at) / [`at_mut`](Self::at_mut) return an [`IndexError`].
/// - `arr[i]` panics.
/// - [`get_unchecked`](Self::get_unchecked) does not check at all and is
///   `unsafe`.
///
/// ```
/// use growarr::{GrowArr, IndexError};
///
/// let arr = GrowArr::from([1, 2, 3]);
/// assert_eq!(arr.at(2), Ok(&3));
/// assert_eq!(arr.at(3), Err(IndexError { index: 3, len: 3 }));
/// ```
///
/// ```should_panic
/// use growarr::GrowArr;
///
/// let arr = GrowArr::from([1, 2, 3]);
/// println!("{}", arr[3]); // Panics!
/// ```
///
/// # Capacity
///
/// Capacity never shrinks. [`pop`](Self::pop) and [`clear`](Self::clear)
/// drop elements but keep the block, so a cleared array can be refilled up to
/// its old length without reallocating. The block is released only when the
/// array is dropped or its storage is handed to another array.
///
/// # Copy and move
///
/// [`Clone`] produces an independent array with the same capacity as the
/// source. Moving a `GrowArr` never touches its elements; to move out of a
/// place that must stay usable, use [`take`](Self::take) or
/// [`take_from`](Self::take_from), which leave the source empty with no
/// storage.
pub struct GrowArr<T> {
    buf: RawBuf<T>,
    len: usize,
}

impl<T> Default for GrowArr<T> {
    #[inline]
    fn default() -> Self { Self::new() }
}

impl<T: fmt::Debug> fmt::Debug for GrowArr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for GrowArr<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for GrowArr<T> {}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for GrowArr<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq, const N: usize> PartialEq<&[T; N]> for GrowArr<T> {
    fn eq(&self, other: &&[T; N]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq> PartialEq<[T]> for GrowArr<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq> PartialEq<&[T]> for GrowArr<T> {
    fn eq(&self, other: &&[T]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq> PartialEq<Vec<T>> for GrowArr<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Clone> Clone for GrowArr<T> {

    /// Deep-copies the live elements into a fresh block sized to the source's
    /// capacity.
    ///
    /// # Examples
    /// ```
    /// use growarr::GrowArr;
    ///
    /// let mut arr = GrowArr::from(["aa".to_string(), "bb".to_string()]);
    /// arr.push("cc".to_string());
    ///
    /// let mut copy = arr.clone();
    /// copy[0].push('!');
    ///
    /// assert_eq!(copy.capacity(), arr.capacity());
    /// assert_eq!(arr[0], "aa");
    /// assert_eq!(copy[0], "aa!");
    /// ```
    fn clone(&self) -> Self {
        let mut arr = Self { buf: RawBuf::with_capacity(self.capacity()), len: 0 };
        self.iter().for_each(|v| unsafe { arr.push_unchecked(v.clone()) });
        arr
    }

    /// Copy-assignment. The existing elements are dropped and, unless the
    /// capacities already match, the existing block is replaced by one of the
    /// source's capacity.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        if self.capacity() != source.capacity() {
            self.buf = RawBuf::with_capacity(source.capacity());
        }
        source.iter().for_each(|v| unsafe { self.push_unchecked(v.clone()) });
    }
}

impl<T> Drop for GrowArr<T> {
    fn drop(&mut self) {
        // Elements first, in index order. The block itself is released by
        // `RawBuf`, even if an element's destructor panics.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

impl<T> Deref for GrowArr<T> {
    type Target = [T];
    #[inline]
    fn deref(&self) -> &Self::Target { self.as_slice() }
}

impl<T> DerefMut for GrowArr<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target { self.as_mut_slice() }
}

impl<T, I: SliceIndex<[T]>> Index<I> for GrowArr<T> {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(&**self, index)
    }
}

impl<T, I: SliceIndex<[T]>> IndexMut<I> for GrowArr<T> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(&mut **self, index)
    }
}

impl<'a, T> IntoIterator for &'a GrowArr<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<'a, T> IntoIterator for &'a mut GrowArr<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter { self.iter_mut() }
}

impl<T> IntoIterator for GrowArr<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Consumes the array, yielding its elements by value.
    ///
    /// # Examples
    /// ```
    /// use growarr::GrowArr;
    ///
    /// let arr = GrowArr::from([1, 2, 3]);
    /// let mut iter = arr.into_iter();
    ///
    /// assert_eq!(iter.next_back(), Some(3));
    /// assert_eq!(iter.collect::<Vec<_>>(), [1, 2]);
    /// ```
    fn into_iter(self) -> Self::IntoIter {
        let mut arr = ManuallyDrop::new(self);
        let buf = arr.buf.take();
        let iter = unsafe { RawIter::new(buf.ptr(), arr.len) };

        IntoIter::new(buf, iter)
    }
}

impl<T> Extend<T> for GrowArr<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        items.into_iter().for_each(|v| self.push(v));
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for GrowArr<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, items: I) {
        items.into_iter().for_each(|&v| self.push(v));
    }
}

impl<T> FromIterator<T> for GrowArr<T> {
    fn from_iter<I: IntoIterator<Item = T>>(items: I) -> Self {
        let mut arr = Self::new();
        arr.extend(items);
        arr
    }
}

impl<T, const N: usize> From<[T; N]> for GrowArr<T> {

    /// Moves the elements of an array into a block of exactly `N` slots.
    ///
    /// # Examples
    /// ```
    /// use growarr::GrowArr;
    ///
    /// let arr = GrowArr::from([1, 2, 3]);
    /// assert_eq!(arr.capacity(), 3);
    /// ```
    fn from(arr: [T; N]) -> Self {
        let buf = RawBuf::with_capacity(N);
        let arr = ManuallyDrop::new(arr);

        unsafe { ptr::copy_nonoverlapping(arr.as_ptr(), buf.ptr(), N) }
        Self { buf, len: N }
    }
}

impl<T: Clone> From<&[T]> for GrowArr<T> {
    fn from(items: &[T]) -> Self {
        let mut arr = Self { buf: RawBuf::with_capacity(items.len()), len: 0 };
        items.iter().for_each(|v| unsafe { arr.push_unchecked(v.clone()) });
        arr
    }
}

impl<T> From<GrowArr<T>> for Vec<T> {
    fn from(arr: GrowArr<T>) -> Self {
        arr.into_iter().collect()
    }
}

impl<T> GrowArr<T> {

    /// Constructs a new, empty `GrowArr<T>`.
    ///
    /// Nothing is allocated until the first element is pushed.
    ///
    /// # Examples
    /// ```
    /// use growarr::GrowArr;
    ///
    /// let arr = GrowArr::<i32>::new();
    /// assert_eq!(arr.capacity(), 0);
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Self { buf: RawBuf::new(), len: 0 }
    }

    /// Constructs an array of `count` copies of `value`.
    ///
    /// Allocates exactly `count` slots, so `len == capacity == count`. The last
    /// slot receives `value` itself; the others receive clones.
    ///
    /// # Panics
    ///
    /// Panics if `count` slots of `T` exceed `isize::MAX` bytes.
    ///
    /// # Examples
    /// ```
    /// use growarr::GrowArr;
    ///
    /// let arr = GrowArr::from_elem(3, "ab".to_string());
    /// assert_eq!(arr, ["ab", "ab", "ab"].map(String::from));
    /// assert_eq!(arr.capacity(), 3);
    /// ```
    pub fn from_elem(count: usize, value: T) -> Self
    where
        T: Clone,
    {
        let mut arr = Self { buf: RawBuf::with_capacity(count), len: 0 };
        if count == 0 { return arr }

        for _ in 1..count {
            unsafe { arr.push_unchecked(value.clone()) }
        }
        unsafe { arr.push_unchecked(value) }
        arr
    }

    /// Constructs an array of `count` default values.
    ///
    /// # Examples
    /// ```
    /// use growarr::GrowArr;
    ///
    /// let arr = GrowArr::<u8>::with_len(4);
    /// assert_eq!(arr, [0, 0, 0, 0]);
    /// ```
    pub fn with_len(count: usize) -> Self
    where
        T: Default,
    {
        let mut arr = Self { buf: RawBuf::with_capacity(count), len: 0 };
        for _ in 0..count {
            unsafe { arr.push_unchecked(T::default()) }
        }
        arr
    }

    /// Returns the number of live elements.
    #[inline(always)]
    pub const fn len(&self) -> usize { self.len }

    /// Returns `true` if the array holds no elements.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool { self.len == 0 }

    /// Returns the number of slots in the current block.
    ///
    /// # Examples
    /// ```
    /// use growarr::GrowArr;
    ///
    /// let mut arr = GrowArr::new();
    /// let caps: Vec<_> = (0..5).map(|i| { arr.push(i); arr.capacity() }).collect();
    ///
    /// assert_eq!(caps, [1, 2, 4, 4, 8]);
    /// ```
    #[inline(always)]
    pub const fn capacity(&self) -> usize { self.buf.capacity() }

    /// Returns how many more elements fit before the next growth.
    ///
    /// Simply, `capacity - len`.
    #[inline(always)]
    pub const fn remaining_capacity(&self) -> usize { self.capacity() - self.len }

    /// Appends an element to the back of the array, doubling the capacity
    /// first if the array is full.
    ///
    /// Growth moves every element into a new block, so references into the
    /// array cannot be held across a `push`.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows. Aborts through
    /// [`handle_alloc_error`](std::alloc::handle_alloc_error) if the allocator
    /// fails. For a non-panicking `push`, see [`try_push`](Self::try_push).
    ///
    /// # Examples
    /// ```
    /// use growarr::GrowArr;
    ///
    /// let mut arr = GrowArr::from([1, 2]);
    /// arr.push(3);
    /// assert_eq!(arr, [1, 2, 3]);
    /// assert_eq!(arr.capacity(), 4);
    /// ```
    ///
    /// # Time Complexity
    ///
    /// Takes amortized *O*(1) time. A push into a full array takes *O*(`len`).
    #[inline]
    pub fn push(&mut self, value: T) {
        if self.len == self.capacity() { infallible(self.grow()) }
        unsafe { self.push_unchecked(value) }
    }

    /// Attempts to append an element to the back of the array.
    ///
    /// If growing the storage fails, `value` is dropped, the array is left
    /// exactly as it was and the error is returned.
    ///
    /// # Examples
    /// ```
    /// use growarr::GrowArr;
    ///
    /// let mut arr = GrowArr::new();
    /// assert!(arr.try_push(1).is_ok());
    /// assert_eq!(arr, [1]);
    /// ```
    #[inline]
    pub fn try_push(&mut self, value: T) -> Result<(), AllocErr> {
        if self.len == self.capacity() { self.grow()?; }
        unsafe { self.push_unchecked(value) }
        Ok(())
    }

    /// Appends a clone of `value`.
    ///
    /// The copying counterpart of [`push`](Self::push), which moves its
    /// argument in.
    ///
    /// # Examples
    /// ```
    /// use growarr::GrowArr;
    ///
    /// let name = "ab".to_string();
    /// let mut arr = GrowArr::new();
    /// arr.push_clone(&name);
    ///
    /// assert_eq!(arr, [name]);
    /// ```
    #[inline]
    pub fn push_clone(&mut self, value: &T)
    where
        T: Clone,
    {
        self.push(value.clone())
    }

    /// Clones and appends every element of `items`, in order.
    pub fn extend_from_slice(&mut self, items: &[T])
    where
        T: Clone,
    {
        items.iter().for_each(|v| self.push(v.clone()));
    }

    /// Appends an element without checking for room.
    ///
    /// # Safety
    ///
    /// `len < capacity` must hold. Calling this on a full array is
    /// [undefined behavior](<https://doc.rust-lang.org/reference/behavior-considered-undefined.html>).
    ///
    /// # Examples
    /// ```
    /// use growarr::GrowArr;
    ///
    /// let mut arr = GrowArr::from([1, 2]);
    /// arr.push(3);
    /// assert_eq!(arr.remaining_capacity(), 1);
    ///
    /// unsafe { arr.push_unchecked(4); }
    /// assert_eq!(arr, [1, 2, 3, 4]);
    /// ```
    #[inline(always)]
    pub unsafe fn push_unchecked(&mut self, value: T) {
        debug_assert!(self.len < self.capacity());
        unsafe { self.buf.ptr().add(self.len).write(value) }
        self.len += 1;
    }

    #[cold]
    fn grow(&mut self) -> Result<(), AllocErr> {
        unsafe { self.buf.try_grow(self.len) }
    }

    /// Removes the last element and returns it.
    ///
    /// The capacity is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyError`] if the array is empty.
    ///
    /// # Examples
    /// ```
    /// use growarr::{EmptyError, GrowArr};
    ///
    /// let mut arr = GrowArr::from([1]);
    /// assert_eq!(arr.pop(), Ok(1));
    /// assert_eq!(arr.pop(), Err(EmptyError));
    /// ```
    ///
    /// # Time Complexity
    ///
    /// Takes *O*(1) time.
    #[inline]
    pub fn pop(&mut self) -> Result<T, EmptyError> {
        match self.len == 0 {
            true => Err(EmptyError),
            false => unsafe {
                self.len -= 1;
                Ok(self.buf.ptr().add(self.len).read())
            }
        }
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns an [`IndexError`] unless `index < len`.
    ///
    /// # Examples
    /// ```
    /// use growarr::GrowArr;
    ///
    /// let arr = GrowArr::from([10, 20]);
    /// assert_eq!(arr.at(1), Ok(&20));
    /// assert!(arr.at(2).is_err());
    /// ```
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T, IndexError> {
        match index < self.len {
            true => Ok(unsafe { self.get_unchecked(index) }),
            false => Err(IndexError { index, len: self.len }),
        }
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns an [`IndexError`] unless `index < len`.
    ///
    /// # Examples
    /// ```
    /// use growarr::GrowArr;
    ///
    /// let mut arr = GrowArr::from([10, 20]);
    /// *arr.at_mut(0).unwrap() = 5;
    /// assert_eq!(arr, [5, 20]);
    /// ```
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, IndexError> {
        match index < self.len {
            true => Ok(unsafe { self.get_unchecked_mut(index) }),
            false => Err(IndexError { index, len: self.len }),
        }
    }

    /// Returns a reference to the element at `index` without bounds checking.
    ///
    /// # Safety
    ///
    /// `index < len` must hold.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        unsafe { &*self.buf.ptr().add(index) }
    }

    /// Returns a mutable reference to the element at `index` without bounds
    /// checking.
    ///
    /// # Safety
    ///
    /// `index < len` must hold.
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        unsafe { &mut *self.buf.ptr().add(index) }
    }

    /// Drops every element, in index order, keeping the storage.
    ///
    /// # Examples
    /// ```
    /// use growarr::GrowArr;
    ///
    /// let mut arr = GrowArr::from([1, 2, 3]);
    /// arr.clear();
    ///
    /// assert!(arr.is_empty());
    /// assert_eq!(arr.capacity(), 3);
    /// ```
    pub fn clear(&mut self) {
        let elems: *mut [T] = self.as_mut_slice();
        // A panicking destructor leaks the rest rather than dropping twice.
        self.len = 0;
        unsafe { ptr::drop_in_place(elems) }
    }

    /// Moves the contents out, leaving an empty array with no storage behind.
    ///
    /// No element is cloned or dropped.
    ///
    /// # Examples
    /// ```
    /// use growarr::GrowArr;
    ///
    /// let mut arr = GrowArr::from([10, 20]);
    /// let moved = arr.take();
    ///
    /// assert_eq!(moved, [10, 20]);
    /// assert_eq!((arr.len(), arr.capacity()), (0, 0));
    /// ```
    #[inline]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Move-assignment: drops the current elements, releases the current
    /// block and adopts `source`'s storage, leaving `source` empty with no
    /// storage.
    ///
    /// # Examples
    /// ```
    /// use growarr::GrowArr;
    ///
    /// let mut dst = GrowArr::from([1, 2, 3, 4]);
    /// let mut src = GrowArr::from([5]);
    /// dst.take_from(&mut src);
    ///
    /// assert_eq!(dst, [5]);
    /// assert!(src.is_empty());
    /// ```
    #[inline]
    pub fn take_from(&mut self, source: &mut Self) {
        *self = source.take();
    }

    /// Extracts a slice of the live elements.
    ///
    /// Equivalent to `&arr[..]`.
    #[inline]
    pub const fn as_slice(&self) -> &[T] {
        // Slots below `len` are initialized, and the pointer is aligned and
        // non-null even without storage.
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }

    /// Extracts a mutable slice of the live elements.
    ///
    /// Equivalent to `&mut arr[..]`.
    #[inline]
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }

    /// Returns a raw pointer to the first slot.
    ///
    /// The pointer is dangling while the array has no storage and is
    /// invalidated by any growth.
    #[inline]
    pub const fn as_ptr(&self) -> *const T { self.buf.ptr() }

    #[inline]
    pub const fn as_mut_ptr(&mut self) -> *mut T { self.buf.ptr() }
}
