//! Element allocators: raw memory on one side, construction on the other.
//!
//! An [`Allocator`] hands out blocks of uninitialized slots and takes them
//! back; it never assumes any slot holds a value. Building a value into a
//! slot and tearing it down again are separate steps ([`construct`] and
//! [`destroy`]), so a container can decide exactly which slots are live.
//!
//! Allocators are stateless strategy objects. The typed helpers are generic
//! over the element type, so one allocator value serves every element type
//! without being rebound.
//!
//! [`construct`]: Allocator::construct
//! [`destroy`]: Allocator::destroy

use crate::{Error, Result};

use core::alloc::Layout;
use core::mem::size_of;
use core::ptr::{self, NonNull};

/// Computes the layout of `n` consecutive `T`s, rejecting sizes the address
/// space cannot hold.
#[inline]
pub(crate) fn array_layout<T>(n: usize) -> Result<Layout> {
    Layout::array::<T>(n).map_err(|_| Error::CapacityOverflow)
}

/// An interface for a source of uninitialized memory for use by containers.
///
/// # Safety
/// Implementors must return blocks that are valid for reads and writes of
/// `layout.size()` bytes, aligned to `layout.align()`, and that stay valid
/// until passed back to [`deallocate_raw`](Allocator::deallocate_raw). Clones
/// of an allocator must be interchangeable: a block obtained from one may be
/// released through any other.
pub unsafe trait Allocator: Clone {
    /// Attempts to allocate a block of memory described by `layout`.
    ///
    /// `layout.size()` is never zero; the typed helpers handle empty requests
    /// without calling this.
    fn allocate_raw(&self, layout: Layout) -> Result<NonNull<u8>>;

    /// Releases a block previously returned by [`allocate_raw`](Allocator::allocate_raw).
    ///
    /// # Safety
    /// `ptr` must denote a live block allocated by this allocator (or a clone
    /// of it) with exactly this `layout`.
    unsafe fn deallocate_raw(&self, ptr: NonNull<u8>, layout: Layout);

    /// Allocates room for `n` values of type `T`, none of them initialized.
    ///
    /// Empty requests (`n == 0`, or any `n` for a zero-sized `T`) do not touch
    /// the underlying memory source and yield a dangling pointer that must
    /// never be dereferenced.
    ///
    /// # Examples
    /// ```
    /// use vessel::{Allocator, Global};
    ///
    /// let slots = Global.allocate::<u32>(4).unwrap();
    /// unsafe {
    ///     Global.construct(slots, 7);
    ///     assert_eq!(*slots.as_ptr(), 7);
    ///     Global.destroy(slots);
    ///     Global.deallocate(slots, 4);
    /// }
    /// ```
    #[inline]
    fn allocate<T>(&self, n: usize) -> Result<NonNull<T>> {
        let layout = array_layout::<T>(n)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        self.allocate_raw(layout).map(NonNull::cast)
    }

    /// Releases `n` slots previously obtained from [`allocate`](Allocator::allocate).
    ///
    /// Releasing an empty block is a no-op. Values still stored in the slots
    /// are not dropped.
    ///
    /// # Safety
    /// `ptr` must have been returned by `allocate::<T>(n)` on this allocator
    /// (or a clone of it), with the same `n`, and not released since.
    #[inline]
    unsafe fn deallocate<T>(&self, ptr: NonNull<T>, n: usize) {
        let size = size_of::<T>() * n;
        if size == 0 {
            return;
        }

        let layout = Layout::from_size_align_unchecked(size, core::mem::align_of::<T>());
        self.deallocate_raw(ptr.cast(), layout);
    }

    /// Moves `value` into the uninitialized slot at `slot`.
    ///
    /// # Safety
    /// `slot` must be valid for writes and properly aligned. Any value
    /// previously stored there is overwritten without being dropped.
    #[inline]
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        slot.as_ptr().write(value);
    }

    /// Runs the destructor of the value at `slot`, leaving the slot
    /// uninitialized but still allocated.
    ///
    /// # Safety
    /// `slot` must hold a live value, which must not be used afterwards.
    #[inline]
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        ptr::drop_in_place(slot.as_ptr());
    }

    /// Runs the destructors of `count` consecutive values starting at `first`.
    ///
    /// If one of the destructors panics, the remaining values are still
    /// dropped before the panic propagates.
    ///
    /// # Safety
    /// All `count` slots must hold live values, which must not be used
    /// afterwards.
    #[inline]
    unsafe fn destroy_range<T>(&self, first: NonNull<T>, count: usize) {
        ptr::drop_in_place(ptr::slice_from_raw_parts_mut(first.as_ptr(), count));
    }

    /// Returns the largest number of `T`s a single allocation could hold.
    ///
    /// # Examples
    /// ```
    /// use vessel::{Allocator, Global};
    ///
    /// assert_eq!(Global.max_size::<()>(), usize::MAX);
    /// assert_eq!(Global.max_size::<u64>(), isize::MAX as usize / 8);
    /// ```
    #[inline]
    fn max_size<T>(&self) -> usize {
        match size_of::<T>() {
            0 => usize::MAX,
            size => isize::MAX as usize / size,
        }
    }
}

/// The global memory allocator.
///
/// Forwards to whatever allocator is registered with `#[global_allocator]`,
/// the system allocator by default. All instances are equal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Global;

unsafe impl Allocator for Global {
    #[inline]
    fn allocate_raw(&self, layout: Layout) -> Result<NonNull<u8>> {
        debug_assert!(layout.size() != 0);
        let ptr = unsafe { alloc::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(Error::AllocFailed { layout })
    }

    #[inline]
    unsafe fn deallocate_raw(&self, ptr: NonNull<u8>, layout: Layout) {
        alloc::alloc::dealloc(ptr.as_ptr(), layout);
    }
}
