//! Owned allocations that do not track which slots are initialized.

use crate::allocator::Allocator;
use crate::Result;

use core::marker::PhantomData;
use core::mem::ManuallyDrop;
use core::ptr::{self, NonNull};

/// An owned block of `cap` slots for `T`, obtained from `A`.
///
/// Dropping a `RawBuf` returns the memory to the allocator but never drops
/// any value stored in it; that is the job of whoever tracks the live range.
pub(crate) struct RawBuf<T, A: Allocator> {
    ptr: NonNull<T>,
    cap: usize,
    alloc: A,
    elem: PhantomData<T>, // Indicates this may own values of type T
}

unsafe impl<T: Send, A: Allocator + Send> Send for RawBuf<T, A> {}
unsafe impl<T: Sync, A: Allocator + Sync> Sync for RawBuf<T, A> {}

impl<T, A: Allocator> RawBuf<T, A> {
    /// A buffer without capacity, which owns no memory.
    #[inline]
    pub(crate) const fn dangling(alloc: A) -> Self {
        RawBuf {
            ptr: NonNull::dangling(),
            cap: 0,
            alloc,
            elem: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn try_allocate(cap: usize, alloc: A) -> Result<Self> {
        let ptr = alloc.allocate::<T>(cap)?;
        Ok(RawBuf {
            ptr,
            cap,
            alloc,
            elem: PhantomData,
        })
    }

    #[inline]
    pub(crate) fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns a pointer to slot `index`, which may be one past the end.
    ///
    /// # Safety
    /// `index` must not exceed the capacity.
    #[inline]
    pub(crate) unsafe fn slot(&self, index: usize) -> NonNull<T> {
        debug_assert!(index <= self.cap);
        NonNull::new_unchecked(self.ptr.as_ptr().add(index))
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }
}

impl<T, A: Allocator> Drop for RawBuf<T, A> {
    fn drop(&mut self) {
        unsafe { self.alloc.deallocate(self.ptr, self.cap) }
    }
}

/// A fresh buffer being filled in before it replaces another one.
///
/// Owns the values in its first `init` slots. Other slots may hold bitwise
/// copies of values still owned elsewhere; those are ignored. If a staging
/// buffer is dropped without being committed, it drops the owned prefix and
/// frees the memory, so the buffer it was meant to replace stays the only
/// owner of everything it had.
pub(crate) struct Staging<T, A: Allocator> {
    buf: RawBuf<T, A>,
    init: usize,
}

impl<T, A: Allocator> Staging<T, A> {
    #[inline]
    pub(crate) fn try_new(cap: usize, alloc: A) -> Result<Self> {
        Ok(Staging {
            buf: RawBuf::try_allocate(cap, alloc)?,
            init: 0,
        })
    }

    /// Number of owned values at the front of the buffer.
    #[inline]
    pub(crate) fn initialized(&self) -> usize {
        self.init
    }

    /// Constructs `value` in the first unowned slot and takes ownership of it.
    ///
    /// # Panics
    /// Debug builds panic if the buffer is already full.
    #[inline]
    pub(crate) fn push(&mut self, value: T) {
        debug_assert!(self.init < self.buf.capacity());
        unsafe {
            let slot = self.buf.slot(self.init);
            self.buf.allocator().construct(slot, value);
        }
        self.init += 1;
    }

    /// Constructs `value` at slot `index` without taking ownership of it.
    ///
    /// # Safety
    /// `index` must be in bounds and at or past `initialized()`. Nothing may
    /// fail between this call and [`commit`](Staging::commit), or the value
    /// leaks.
    #[inline]
    pub(crate) unsafe fn construct_at(&mut self, index: usize, value: T) {
        debug_assert!(self.init <= index && index < self.buf.capacity());
        let slot = self.buf.slot(index);
        self.buf.allocator().construct(slot, value);
    }

    /// Copies `count` values from `src` into the slots starting at `at`.
    ///
    /// The values remain owned by `src` until the staging buffer is
    /// committed and the source forgets them.
    ///
    /// # Safety
    /// `src` must be valid for `count` reads and must not overlap this buffer;
    /// `at + count` must not exceed the capacity and `at` must be at or past
    /// `initialized()`.
    #[inline]
    pub(crate) unsafe fn relocate(&mut self, src: *const T, at: usize, count: usize) {
        debug_assert!(self.init <= at && at + count <= self.buf.capacity());
        ptr::copy_nonoverlapping(src, self.buf.slot(at).as_ptr(), count);
    }

    /// Hands over the buffer. The caller becomes responsible for every value
    /// in it, owned or relocated.
    #[inline]
    pub(crate) fn commit(self) -> RawBuf<T, A> {
        let this = ManuallyDrop::new(self);
        unsafe { ptr::read(&this.buf) }
    }
}

impl<T, A: Allocator> Drop for Staging<T, A> {
    fn drop(&mut self) {
        if self.init != 0 {
            unsafe {
                let first = self.buf.slot(0);
                self.buf.allocator().destroy_range(first, self.init);
            }
        }
        // `buf` frees the memory
    }
}
