use std::{alloc::{self, alloc, dealloc, Layout}, marker::PhantomData, mem, ptr::{self, NonNull}};

use crate::errors::AllocErr;


#[inline]
pub(super) fn infallible<T>(result: Result<T, AllocErr>) -> T {
    match result {
        Ok(x) => x,
        Err(AllocErr::Layout) => panic!("capacity overflow"),
        Err(AllocErr::Overflow) => panic!("capacity overflow"),
        Err(AllocErr::Alloc { layout }) => alloc::handle_alloc_error(layout),
    }
}

#[inline]
fn layout_array<T>(n: usize) -> Result<Layout, AllocErr> {

    let size = mem::size_of::<T>()
        .checked_mul(n)
        .ok_or(AllocErr::Overflow)?;

    let align = mem::align_of::<T>();

    Layout::from_size_align(size, align).map_err(AllocErr::layout)
}

/// Allocates an uninitialized block of `cap` slots.
///
/// Zero-sized requests (`cap == 0` or a zero-sized `T`) never reach the
/// allocator and yield a dangling, well-aligned pointer.
fn allocate<T>(cap: usize) -> Result<NonNull<T>, AllocErr> {
    let layout = layout_array::<T>(cap)?;
    if layout.size() == 0 { return Ok(NonNull::dangling()) }

    let ptr = NonNull::new(unsafe { alloc(layout) })
        .ok_or(AllocErr::alloc(layout))?
        .cast();

    log::trace!("allocated block of {cap} slots ({} bytes) at {ptr:?}", layout.size());
    Ok(ptr)
}

/// # Safety
///
/// `ptr` must have come from [`allocate`] with the same `cap`.
unsafe fn deallocate<T>(ptr: NonNull<T>, cap: usize) {
    let size = mem::size_of::<T>() * cap;
    if size == 0 { return }

    // The block was allocated with exactly this layout, so it is valid.
    let layout = unsafe { Layout::from_size_align_unchecked(size, mem::align_of::<T>()) };
    unsafe { dealloc(ptr.as_ptr().cast(), layout) };
    log::trace!("released block of {cap} slots at {ptr:?}");
}


/// An exclusively owned storage block of `cap` slots.
///
/// `RawBuf` tracks capacity only. It never constructs or drops elements; the
/// owner is responsible for every slot it has written to.
pub(super) struct RawBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
    _marker: PhantomData<T>,
}

unsafe impl<T: Send> Send for RawBuf<T> {}
unsafe impl<T: Sync> Sync for RawBuf<T> {}

impl<T> RawBuf<T> {

    /// Capacity of the first block handed out to an empty buffer.
    pub(super) const MIN_NON_ZERO_CAP: usize = 1;

    /// Factor applied to the capacity on every growth.
    pub(super) const GROWTH_FACTOR: usize = 2;

    #[inline]
    pub(super) const fn new() -> Self {
        Self { ptr: NonNull::dangling(), cap: 0, _marker: PhantomData }
    }

    #[inline]
    pub(super) fn try_with_capacity(cap: usize) -> Result<Self, AllocErr> {
        let ptr = allocate::<T>(cap)?;
        Ok(Self { ptr, cap, _marker: PhantomData })
    }

    #[inline]
    pub(super) fn with_capacity(cap: usize) -> Self {
        infallible(Self::try_with_capacity(cap))
    }

    #[inline(always)]
    pub(super) const fn ptr(&self) -> *mut T { self.ptr.as_ptr() }

    #[inline(always)]
    pub(super) const fn capacity(&self) -> usize { self.cap }

    /// The capacity the next growth will produce: `1` from empty, doubled
    /// afterwards.
    #[inline]
    pub(super) const fn next_capacity(&self) -> Result<usize, AllocErr> {
        match self.cap {
            0 => Ok(Self::MIN_NON_ZERO_CAP),
            cap => match cap.checked_mul(Self::GROWTH_FACTOR) {
                Some(new_cap) => Ok(new_cap),
                None => Err(AllocErr::Overflow),
            }
        }
    }

    /// Relocates the first `len` slots into a fresh block of
    /// [`next_capacity`](Self::next_capacity) slots and releases the old one.
    ///
    /// Every fallible step runs before the buffer is modified. On error the
    /// old block and its contents are left exactly as they were.
    ///
    /// # Safety
    ///
    /// `len <= self.capacity()` and slots `[0, len)` must be initialized.
    #[cold]
    pub(super) unsafe fn try_grow(&mut self, len: usize) -> Result<(), AllocErr> {
        debug_assert!(len <= self.cap);

        let new_cap = self.next_capacity()
            .and_then(|new_cap| allocate::<T>(new_cap).map(|dst| (new_cap, dst)));

        let (new_cap, dst) = match new_cap {
            Ok(grown) => grown,
            Err(err) => {
                log::debug!("growing block of {} slots failed: {err}", self.cap);
                return Err(err)
            }
        };

        // A bitwise copy is a move: the old slots are logically uninitialized
        // from here on and must not be dropped.
        unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), dst.as_ptr(), len) };
        unsafe { deallocate(self.ptr, self.cap) };

        log::trace!("grew block from {} to {new_cap} slots, relocated {len}", self.cap);
        self.ptr = dst;
        self.cap = new_cap;

        Ok(())
    }

    /// Hands the block over, leaving `self` empty and unallocated.
    #[inline]
    pub(super) fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        unsafe { deallocate(self.ptr, self.cap) }
    }
}


#[cfg(test)]
mod tests {
    use std::{mem::ManuallyDrop, panic};
    use super::*;

    #[test]
    fn infallible_() {
        let results: [Result<i32, AllocErr>; 3] = [
            Ok(3),
            Err(AllocErr::Layout),
            Err(AllocErr::Overflow),
        ];

        let fallibles = results
            .into_iter()
            .map(|err| panic::catch_unwind(|| infallible(err) ))
            .map(|err| err.is_ok())
            .collect::<Vec<_>>();

        assert_eq!(fallibles, [true, false, false]);
    }

    #[test]
    fn layout_array_() {
        assert_eq!(layout_array::<u32>(4), Ok(Layout::array::<u32>(4).unwrap()));
        assert_eq!(layout_array::<u32>(usize::MAX), Err(AllocErr::Overflow));
        assert_eq!(layout_array::<u16>(isize::MAX as usize), Err(AllocErr::Layout));
        assert_eq!(layout_array::<()>(usize::MAX).map(|l| l.size()), Ok(0));
    }

    #[test]
    fn new() {
        let buf = RawBuf::<u64>::new();
        assert_eq!(buf.capacity(), 0);
        assert_eq!(buf.next_capacity(), Ok(1));
    }

    #[test]
    fn with_capacity() {
        let buf = RawBuf::<u64>::with_capacity(5);
        assert_eq!(buf.capacity(), 5);
        assert_eq!(buf.ptr() as usize % mem::align_of::<u64>(), 0);
    }

    #[test]
    fn try_grow_doubles() {
        let mut buf = RawBuf::<u32>::new();
        let mut caps = Vec::new();
        for _ in 0..5 {
            unsafe { buf.try_grow(0).unwrap() };
            caps.push(buf.capacity());
        }

        assert_eq!(caps, [1, 2, 4, 8, 16]);
    }

    #[test]
    fn try_grow_relocates() {
        let mut buf = RawBuf::<String>::with_capacity(2);
        unsafe {
            buf.ptr().write("aa".to_string());
            buf.ptr().add(1).write("bb".to_string());

            buf.try_grow(2).unwrap();
            assert_eq!(buf.capacity(), 4);
            assert_eq!(*buf.ptr(), "aa");
            assert_eq!(*buf.ptr().add(1), "bb");

            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(buf.ptr(), 2));
        }
    }

    #[test]
    fn try_grow_zst() {
        let mut buf = RawBuf::<()>::new();
        unsafe {
            buf.try_grow(0).unwrap();
            buf.try_grow(1).unwrap();
        }
        assert_eq!(buf.capacity(), 2);
        assert_eq!(buf.ptr(), NonNull::<()>::dangling().as_ptr());
    }

    #[test]
    fn try_grow_layout_failure_leaves_buffer() {
        // Never allocated, so it must never be released either.
        let mut buf = ManuallyDrop::new(RawBuf::<u16> {
            ptr: NonNull::dangling(),
            cap: isize::MAX as usize / 2,
            _marker: PhantomData,
        });

        let err = unsafe { buf.try_grow(0) };
        assert_eq!(err, Err(AllocErr::Layout));
        assert_eq!(buf.capacity(), isize::MAX as usize / 2);
        assert_eq!(buf.ptr(), NonNull::<u16>::dangling().as_ptr());
    }

    #[test]
    fn try_grow_overflow_leaves_buffer() {
        let mut buf = ManuallyDrop::new(RawBuf::<()> {
            ptr: NonNull::dangling(),
            cap: usize::MAX / 2 + 1,
            _marker: PhantomData,
        });

        let err = unsafe { buf.try_grow(0) };
        assert_eq!(err, Err(AllocErr::Overflow));
        assert_eq!(buf.capacity(), usize::MAX / 2 + 1);
    }

    #[test]
    fn take() {
        let mut buf = RawBuf::<u8>::with_capacity(8);
        let ptr = buf.ptr();

        let taken = buf.take();
        assert_eq!(taken.capacity(), 8);
        assert_eq!(taken.ptr(), ptr);
        assert_eq!(buf.capacity(), 0);
    }
}
