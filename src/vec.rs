//! A contiguous growable array type over a pluggable [`Allocator`].
//!
//! A [`Vec`] owns one buffer and tracks three positions in it: the start of
//! storage ([`as_ptr`](Vec::as_ptr)), the end of the live elements (`len()`
//! slots further), and the end of the allocation (`capacity()` slots
//! further). Slots between the last two are allocated but uninitialized.
//!
//! Appending doubles the capacity whenever the buffer is full, so a sequence
//! of `n` pushes moves O(n) elements in total. Growth is transactional: the
//! new buffer is filled in on the side and only replaces the old one once
//! every element is in place. If allocating memory or constructing the new
//! element fails (by returning an error or by panicking), the vector is left
//! exactly as it was.
//!
//! Moving an element in Rust is a bitwise copy that cannot fail, so
//! relocating the existing elements into a bigger buffer never needs to fall
//! back to cloning them.
//!
//! Positions are plain indices. Where a C++ container would hand back an
//! iterator, [`erase`](Vec::erase) and [`erase_range`](Vec::erase_range)
//! return the index of the element that now follows the removed ones, and
//! the insertion methods return a reference to the new element.

use crate::allocator::{Allocator, Global};
use crate::raw::{RawBuf, Staging};
use crate::{handle_error, Error, Result};

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut, Index, IndexMut, Range};
use core::ptr;
use core::slice::{self, SliceIndex};

/// A contiguous growable array type.
///
/// Generic over the element type `T` and the allocator `A`.
///
/// See the [module-level documentation](crate::vec) for more.
pub struct Vec<T, A: Allocator = Global> {
    buf: RawBuf<T, A>,
    len: usize,
}

impl<T> Vec<T> {
    /// Constructs a new, empty `Vec` without allocating.
    ///
    /// # Examples
    /// ```
    /// let vec = vessel::Vec::<u32>::new();
    /// assert!(vec.is_empty());
    /// assert_eq!(vec.capacity(), 0);
    /// assert!(vec.data().is_null());
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Self::new_in(Global)
    }

    /// Constructs a new, empty `Vec` with room for exactly `capacity` elements.
    ///
    /// # Panics
    /// Panics if the capacity exceeds [`max_size`](Vec::max_size), or if the
    /// allocation fails.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }
}

impl<T: Clone> Vec<T> {
    /// Constructs a `Vec` holding `n` clones of `value`, with capacity `n`.
    ///
    /// # Examples
    /// ```
    /// let vec = vessel::Vec::from_elem(5, &10);
    /// assert_eq!(vec, [10, 10, 10, 10, 10]);
    /// assert_eq!(vec.capacity(), 5);
    /// ```
    pub fn from_elem(n: usize, value: &T) -> Self {
        Self::from_elem_in(n, value, Global)
    }
}

impl<T, A: Allocator> Vec<T, A> {
    /// Constructs a new, empty `Vec` using `alloc`, without allocating.
    #[inline]
    pub const fn new_in(alloc: A) -> Self {
        Vec {
            buf: RawBuf::dangling(alloc),
            len: 0,
        }
    }

    /// Constructs a new, empty `Vec` using `alloc`, with room for exactly
    /// `capacity` elements.
    ///
    /// # Panics
    /// Panics if the capacity exceeds [`max_size`](Vec::max_size), or if the
    /// allocation fails. See [`try_with_capacity_in`](Vec::try_with_capacity_in)
    /// for a checked version.
    #[inline]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        match Self::try_with_capacity_in(capacity, alloc) {
            Ok(vec) => vec,
            Err(e) => handle_error(e),
        }
    }

    /// Constructs a new, empty `Vec` using `alloc`, with room for exactly
    /// `capacity` elements, returning an error if the memory cannot be
    /// obtained.
    ///
    /// # Examples
    /// ```
    /// use vessel::{Error, Global, Vec};
    ///
    /// let vec = Vec::<u64>::try_with_capacity_in(8, Global).unwrap();
    /// assert_eq!(vec.capacity(), 8);
    ///
    /// let err = Vec::<u64>::try_with_capacity_in(usize::MAX, Global).unwrap_err();
    /// assert_eq!(err, Error::CapacityOverflow);
    /// ```
    #[inline]
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self> {
        Ok(Vec {
            buf: RawBuf::try_allocate(capacity, alloc)?,
            len: 0,
        })
    }

    /// Constructs a `Vec` using `alloc` and holding `n` clones of `value`,
    /// with capacity `n`.
    ///
    /// If a clone panics, the clones made so far are dropped and the memory
    /// is released before the panic propagates.
    pub fn from_elem_in(n: usize, value: &T, alloc: A) -> Self
    where
        T: Clone,
    {
        let mut staging = match Staging::try_new(n, alloc) {
            Ok(staging) => staging,
            Err(e) => handle_error(e),
        };
        for _ in 0..n {
            staging.push(value.clone());
        }

        Self::from_staging(staging)
    }

    #[inline]
    fn from_staging(staging: Staging<T, A>) -> Self {
        let len = staging.initialized();
        Vec {
            buf: staging.commit(),
            len,
        }
    }

    /// Returns the number of elements the vector can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the number of elements in the vector, also referred to as its *length*.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the next insertion has to grow the buffer.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.buf.capacity()
    }

    /// Returns the largest capacity the allocator could provide.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.buf.allocator().max_size::<T>()
    }

    /// Returns a reference to the underlying allocator.
    #[inline]
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// Returns a pointer to the first element, or a null pointer if the
    /// vector has never allocated.
    ///
    /// Unlike [`as_ptr`](Vec::as_ptr), this reveals whether a buffer exists.
    /// The pointer changes whenever the vector reallocates.
    ///
    /// # Examples
    /// ```
    /// let mut vec = vessel::Vec::<i32>::new();
    /// assert!(vec.data().is_null());
    ///
    /// vec.push(1);
    /// assert!(!vec.data().is_null());
    /// assert_eq!(unsafe { *vec.data() }, 1);
    /// ```
    #[inline]
    pub fn data(&self) -> *const T {
        if self.buf.capacity() == 0 {
            ptr::null()
        } else {
            self.buf.ptr()
        }
    }

    /// Returns a raw pointer to the vector's buffer.
    ///
    /// The pointer is never null; it dangles if nothing was allocated yet.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.ptr()
    }

    /// Returns an unsafe mutable pointer to the vector's buffer.
    ///
    /// The pointer is never null; it dangles if nothing was allocated yet.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.ptr()
    }

    /// Extracts a slice containing the entire vector.
    ///
    /// Equivalent to `&s[..]`.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self
    }

    /// Extracts a mutable slice of the entire vector.
    ///
    /// Equivalent to `&mut s[..]`.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    /// Returns a reference to the element at `index`, or an
    /// [`OutOfRange`](Error::OutOfRange) error if there is none.
    ///
    /// # Examples
    /// ```
    /// use vessel::{Error, Vec};
    ///
    /// let vec = Vec::from([1, 2, 3]);
    /// assert_eq!(vec.at(1), Ok(&2));
    /// assert_eq!(vec.at(3), Err(Error::OutOfRange { index: 3, len: 3 }));
    /// ```
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(Error::OutOfRange { index, len })
    }

    /// Returns a mutable reference to the element at `index`, or an
    /// [`OutOfRange`](Error::OutOfRange) error if there is none.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, len })
    }

    /// Grows the buffer to hold exactly `new_cap` elements, returning an error
    /// if the memory cannot be obtained.
    ///
    /// Unlike `std::vec::Vec::reserve`, `new_cap` is the requested total
    /// capacity, not an additional amount. Requests that do not exceed the
    /// current capacity do nothing and keep the buffer in place.
    ///
    /// On error, the vector is unchanged.
    ///
    /// # Examples
    /// ```
    /// let mut vec = vessel::Vec::from([1, 2, 3]);
    /// vec.try_reserve(10).unwrap();
    /// assert_eq!(vec.capacity(), 10);
    /// assert_eq!(vec, [1, 2, 3]);
    ///
    /// let data = vec.data();
    /// vec.try_reserve(4).unwrap();
    /// assert_eq!(vec.data(), data);
    /// ```
    pub fn try_reserve(&mut self, new_cap: usize) -> Result<()> {
        if new_cap <= self.buf.capacity() {
            return Ok(());
        }
        if new_cap > self.max_size() {
            return Err(Error::CapacityOverflow);
        }

        let mut staging = Staging::try_new(new_cap, self.buf.allocator().clone())?;
        unsafe {
            staging.relocate(self.buf.ptr(), 0, self.len);
        }
        self.buf = staging.commit(); // frees the old allocation
        Ok(())
    }

    /// Grows the buffer to hold exactly `new_cap` elements.
    ///
    /// # Panics
    /// Panics if `new_cap` exceeds [`max_size`](Vec::max_size), or if the
    /// allocation fails. See [`try_reserve`](Vec::try_reserve) for a checked
    /// version.
    pub fn reserve(&mut self, new_cap: usize) {
        if let Err(e) = self.try_reserve(new_cap) {
            handle_error(e);
        }
    }

    /// The capacity to grow to when the buffer is full.
    #[inline]
    fn grown_capacity(&self) -> Result<usize> {
        let new_cap = match self.buf.capacity().checked_mul(2) {
            Some(0) => 1,
            Some(doubled) => doubled,
            None => return Err(Error::CapacityOverflow),
        };

        if new_cap > self.max_size() {
            return Err(Error::CapacityOverflow);
        }
        Ok(new_cap)
    }

    #[inline]
    fn grow(&mut self) -> Result<()> {
        let new_cap = self.grown_capacity()?;
        self.try_reserve(new_cap)
    }

    /// Makes room for at least `additional` more elements, at least doubling
    /// the capacity if that requires reallocating.
    fn reserve_for(&mut self, additional: usize) {
        let needed = match self.len.checked_add(additional) {
            Some(needed) => needed,
            None => handle_error(Error::CapacityOverflow),
        };

        if needed > self.buf.capacity() {
            let doubled = usize::min(self.buf.capacity().saturating_mul(2), self.max_size());
            self.reserve(usize::max(needed, doubled));
        }
    }

    /// # Safety
    /// The vector must not be full.
    #[inline]
    unsafe fn push_unchecked(&mut self, value: T) {
        debug_assert!(!self.is_full());
        let slot = self.buf.slot(self.len);
        self.buf.allocator().construct(slot, value);
        self.len += 1;
    }

    /// Appends an element to the back of the vector, returning `Err(value)`
    /// if the buffer is full and cannot be grown.
    ///
    /// # Examples
    /// ```
    /// let mut vec = vessel::Vec::new();
    /// assert!(vec.try_push(1).is_ok());
    /// assert_eq!(vec.capacity(), 1);
    /// assert!(vec.try_push(2).is_ok());
    /// assert_eq!(vec.capacity(), 2);
    /// assert!(vec.try_push(3).is_ok());
    /// assert_eq!(vec.capacity(), 4);
    /// assert_eq!(vec, [1, 2, 3]);
    /// ```
    #[inline]
    pub fn try_push(&mut self, value: T) -> core::result::Result<(), T> {
        if self.is_full() && self.grow().is_err() {
            return Err(value);
        }

        unsafe { self.push_unchecked(value) };
        Ok(())
    }

    /// Appends an element to the back of the vector, doubling the capacity
    /// first if the buffer is full.
    ///
    /// # Panics
    /// Panics if the buffer is full and cannot be grown. See
    /// [`try_push`](Vec::try_push) for a checked version.
    #[inline]
    pub fn push(&mut self, value: T) {
        if self.is_full() {
            if let Err(e) = self.grow() {
                handle_error(e);
            }
        }

        unsafe { self.push_unchecked(value) };
    }

    /// Removes the last element from the vector and returns it, or [`None`] if it is empty.
    ///
    /// # Examples
    /// ```
    /// let mut vec = vessel::Vec::from([1, 2, 3]);
    /// assert_eq!(vec.pop(), Some(3));
    /// assert_eq!(vec, [1, 2]);
    /// ```
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        unsafe { Some(self.buf.slot(self.len).as_ptr().read()) }
    }

    /// Shortens the vector, keeping the first `len` elements and dropping the rest.
    ///
    /// If `len` is greater than or equal to the vector's current length, this
    /// has no effect. The capacity is unchanged.
    ///
    /// # Examples
    /// ```
    /// let mut vec = vessel::Vec::from([1, 2, 3, 4]);
    ///
    /// vec.truncate(6);
    /// assert_eq!(vec, [1, 2, 3, 4]);
    ///
    /// vec.truncate(2);
    /// assert_eq!(vec, [1, 2]);
    /// ```
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }

        let count = self.len - len;
        self.len = len;
        unsafe {
            let first = self.buf.slot(len);
            self.buf.allocator().destroy_range(first, count);
        }
    }

    /// Clears the vector, dropping all values.
    ///
    /// Equivalent to `s.truncate(0)`.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Inserts an element at position `index`, shifting all elements after
    /// it to the right, and returns a reference to it.
    ///
    /// If the buffer is full, a buffer of twice the capacity is allocated and
    /// the elements before `index`, the new element and the elements after
    /// it are placed into it in that order.
    ///
    /// # Panics
    /// Panics if `index > len`, or if the buffer is full and cannot be grown.
    ///
    /// # Examples
    /// ```
    /// let mut vec = vessel::Vec::from([1, 2]);
    /// let data = vec.data();
    ///
    /// assert_eq!(*vec.insert(1, 100), 100);
    /// assert_eq!(vec, [1, 100, 2]);
    /// assert_eq!(vec.capacity(), 4);
    /// assert_ne!(vec.data(), data);
    /// ```
    pub fn insert(&mut self, index: usize, element: T) -> &mut T {
        match self.try_insert_with(index, || Ok::<T, Error>(element)) {
            Ok(inserted) => inserted,
            Err(e) => handle_error(e),
        }
    }

    /// Inserts an element at position `index`, shifting all elements after
    /// it to the right.
    ///
    /// Returns `Err(element)` if the buffer is full and cannot be grown.
    ///
    /// # Panics
    /// Panics if `index > len`.
    ///
    /// # Examples
    /// ```
    /// let mut vec = vessel::Vec::from([1, 2, 3]);
    /// assert!(vec.try_insert(3, 4).is_ok());
    /// assert_eq!(vec, [1, 2, 3, 4]);
    /// ```
    pub fn try_insert(&mut self, index: usize, element: T) -> core::result::Result<&mut T, T> {
        #[cold]
        #[inline(never)]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!(
                "insertion index (is {}) should be <= len (is {})",
                index, len
            );
        }

        if index > self.len {
            assert_failed(index, self.len);
        }

        if !self.is_full() {
            return Ok(unsafe { self.insert_within_capacity(index, element) });
        }

        let mut staging = match self.grown_staging() {
            Ok(staging) => staging,
            Err(_) => return Err(element),
        };
        unsafe {
            staging.relocate(self.buf.ptr(), 0, index);
            staging.construct_at(index, element);
            Ok(self.commit_insertion(staging, index))
        }
    }

    /// Inserts the value returned by `f` at position `index`, shifting all
    /// elements after it to the right.
    ///
    /// If `f` panics, the vector is unchanged.
    ///
    /// # Panics
    /// Panics if `index > len`, or if the buffer is full and cannot be grown.
    pub fn insert_with<F>(&mut self, index: usize, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        match self.try_insert_with(index, || Ok::<T, Error>(f())) {
            Ok(inserted) => inserted,
            Err(e) => handle_error(e),
        }
    }

    /// Inserts the value produced by the fallible constructor `f` at position
    /// `index`, shifting all elements after it to the right.
    ///
    /// Construction is part of the transaction: if the buffer has to grow,
    /// `f` runs after the new buffer was allocated and the leading elements
    /// were moved into it. If `f` returns an error or panics at that point,
    /// the new buffer is released and the vector is unchanged. Failing to
    /// grow the buffer is reported as `E::from(error)` without calling `f`.
    ///
    /// # Panics
    /// Panics if `index > len`.
    ///
    /// # Examples
    /// ```
    /// use vessel::{Error, Vec};
    ///
    /// #[derive(Debug, PartialEq)]
    /// enum BuildError {
    ///     Parse,
    ///     Storage(Error),
    /// }
    ///
    /// impl From<Error> for BuildError {
    ///     fn from(e: Error) -> Self {
    ///         BuildError::Storage(e)
    ///     }
    /// }
    ///
    /// let mut vec = Vec::from([1, 3]);
    /// vec.try_insert_with(1, || "2".parse::<i32>().map_err(|_| BuildError::Parse))?;
    /// assert_eq!(vec, [1, 2, 3]);
    ///
    /// let failed = vec.try_insert_with(1, || "x".parse::<i32>().map_err(|_| BuildError::Parse));
    /// assert_eq!(failed, Err(BuildError::Parse));
    /// assert_eq!(vec, [1, 2, 3]);
    /// # Ok::<(), BuildError>(())
    /// ```
    pub fn try_insert_with<E, F>(&mut self, index: usize, f: F) -> core::result::Result<&mut T, E>
    where
        E: From<Error>,
        F: FnOnce() -> core::result::Result<T, E>,
    {
        #[cold]
        #[inline(never)]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!(
                "insertion index (is {}) should be <= len (is {})",
                index, len
            );
        }

        let len = self.len;
        if index > len {
            assert_failed(index, len);
        }

        if len < self.buf.capacity() {
            let element = f()?;
            return Ok(unsafe { self.insert_within_capacity(index, element) });
        }

        let mut staging = self.grown_staging()?;
        unsafe {
            staging.relocate(self.buf.ptr(), 0, index);
            let element = f()?;
            staging.construct_at(index, element);
            Ok(self.commit_insertion(staging, index))
        }
    }

    /// An empty staging buffer of the grown capacity.
    #[inline]
    fn grown_staging(&self) -> Result<Staging<T, A>> {
        let new_cap = self.grown_capacity()?;
        Staging::try_new(new_cap, self.buf.allocator().clone())
    }

    /// Moves the elements from `index` onwards behind the new element in
    /// `staging` and adopts it as the vector's buffer.
    ///
    /// # Safety
    /// `staging` must hold the relocated prefix `[0, index)` and the new
    /// element at `index`, and have room for `len + 1` elements.
    unsafe fn commit_insertion(&mut self, mut staging: Staging<T, A>, index: usize) -> &mut T {
        let len = self.len;
        staging.relocate(self.buf.ptr().add(index), index + 1, len - index);

        self.buf = staging.commit(); // frees the old allocation
        self.len = len + 1;
        &mut *self.buf.slot(index).as_ptr()
    }

    /// # Safety
    /// The vector must not be full, and `index` must not exceed its length.
    unsafe fn insert_within_capacity(&mut self, index: usize, element: T) -> &mut T {
        debug_assert!(!self.is_full() && index <= self.len);

        let slot = self.buf.slot(index);
        // overlapping move of the tail one slot towards the end
        ptr::copy(slot.as_ptr(), slot.as_ptr().add(1), self.len - index);
        self.buf.allocator().construct(slot, element);
        self.len += 1;

        &mut *slot.as_ptr()
    }

    /// Removes and returns the element at position `index` within the vector,
    /// shifting all elements after it to the left.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds. See [`erase`](Vec::erase) for a
    /// lenient version.
    ///
    /// # Examples
    /// ```
    /// let mut vec = vessel::Vec::from([1, 2, 3]);
    /// assert_eq!(vec.remove(0), 1);
    /// assert_eq!(vec, [2, 3]);
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        #[cold]
        #[inline(never)]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("removal index (is {}) should be < len (is {})", index, len);
        }

        let len = self.len;
        if index >= len {
            assert_failed(index, len);
        }

        unsafe {
            let p = self.buf.slot(index).as_ptr();
            let ret = ptr::read(p);
            ptr::copy(p.add(1), p, len - index - 1);
            self.len = len - 1;
            ret
        }
    }

    /// Drops the element at position `index`, shifting all elements after it
    /// to the left, and returns the position of the element that followed it.
    ///
    /// The returned position equals `len()` if the last element was erased.
    /// Erasing at or past the end does nothing and returns `index`.
    ///
    /// # Examples
    /// ```
    /// let mut vec = vessel::Vec::from([1, 2, 3]);
    ///
    /// let next = vec.erase(1);
    /// assert_eq!(vec, [1, 3]);
    /// assert_eq!(vec[next], 3);
    ///
    /// assert_eq!(vec.erase(1), vec.len());
    /// assert_eq!(vec, [1]);
    ///
    /// assert_eq!(vec.erase(5), 5);
    /// assert_eq!(vec, [1]);
    /// ```
    pub fn erase(&mut self, index: usize) -> usize {
        if index < self.len {
            drop(self.remove(index));
        }
        index
    }

    /// Drops the elements in `range`, shifting all elements after it to the
    /// left, and returns the position of the element that followed the range.
    ///
    /// Empty ranges, ranges whose end precedes their start, and ranges
    /// reaching past the end of the vector are ignored; in those cases the
    /// vector is unchanged and `range.start` is returned.
    ///
    /// If dropping one of the elements panics, the remaining ones in the range
    /// are still dropped and the elements after the range are still moved
    /// into place.
    ///
    /// # Examples
    /// ```
    /// let mut vec = vessel::Vec::from([10, 20, 30, 40, 50, 60]);
    ///
    /// let next = vec.erase_range(1..4);
    /// assert_eq!(vec, [10, 50, 60]);
    /// assert_eq!(vec[next], 50);
    ///
    /// assert_eq!(vec.erase_range(2..1), 2);
    /// assert_eq!(vec.erase_range(1..7), 1);
    /// assert_eq!(vec, [10, 50, 60]);
    ///
    /// vec.erase_range(0..vec.len());
    /// assert!(vec.is_empty());
    /// ```
    pub fn erase_range(&mut self, range: Range<usize>) -> usize {
        struct CloseGap<'a, T, A: Allocator> {
            vec: &'a mut Vec<T, A>,
            start: usize,
            end: usize,
            tail: usize,
        }

        impl<T, A: Allocator> Drop for CloseGap<'_, T, A> {
            fn drop(&mut self) {
                unsafe {
                    let base = self.vec.buf.ptr();
                    ptr::copy(base.add(self.end), base.add(self.start), self.tail);
                }
                self.vec.len = self.start + self.tail;
            }
        }

        let Range { start, end } = range;
        if start >= end || end > self.len {
            return start;
        }

        let tail = self.len - end;
        self.len = start;

        let gap = CloseGap {
            vec: self,
            start,
            end,
            tail,
        };
        unsafe {
            let first = gap.vec.buf.slot(start);
            gap.vec.buf.allocator().destroy_range(first, end - start);
        }
        drop(gap);

        start
    }

    /// Resizes the vector in place so that its length equals `new_len`.
    ///
    /// Extra slots are filled with clones of `value`; if the vector shrinks,
    /// the surplus elements are dropped.
    ///
    /// # Examples
    /// ```
    /// let mut vec = vessel::Vec::from(["hello"]);
    /// vec.resize(3, "world");
    /// assert_eq!(vec, ["hello", "world", "world"]);
    ///
    /// vec.resize(1, "unused");
    /// assert_eq!(vec, ["hello"]);
    /// ```
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }

        self.reserve_for(new_len - self.len);
        while self.len + 1 < new_len {
            unsafe { self.push_unchecked(value.clone()) };
        }
        unsafe { self.push_unchecked(value) };
    }

    /// Clones and appends all elements in a slice to the vector.
    ///
    /// # Examples
    /// ```
    /// let mut vec = vessel::Vec::from([1]);
    /// vec.extend_from_slice(&[2, 3, 4]);
    /// assert_eq!(vec, [1, 2, 3, 4]);
    /// ```
    pub fn extend_from_slice(&mut self, other: &[T])
    where
        T: Clone,
    {
        self.reserve_for(other.len());
        for item in other {
            unsafe { self.push_unchecked(item.clone()) };
        }
    }
}

impl<T, A: Allocator + Default> Default for Vec<T, A> {
    #[inline]
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, A: Allocator> Clone for Vec<T, A> {
    /// Allocates a buffer of the same capacity and clones every element
    /// into it.
    ///
    /// If a clone panics, the clones made so far are dropped and the new
    /// buffer is released before the panic propagates.
    fn clone(&self) -> Self {
        let mut staging = match Staging::try_new(self.capacity(), self.buf.allocator().clone()) {
            Ok(staging) => staging,
            Err(e) => handle_error(e),
        };
        for item in self.iter() {
            staging.push(item.clone());
        }

        Self::from_staging(staging)
    }

    /// Replaces the contents of `self` with clones of the elements of
    /// `source`, taking over its capacity.
    ///
    /// The copy is built first; if that fails, `self` is unchanged.
    fn clone_from(&mut self, source: &Self) {
        *self = source.clone();
    }
}

impl<T, A: Allocator> Drop for Vec<T, A> {
    fn drop(&mut self) {
        unsafe {
            let first = self.buf.slot(0);
            self.buf.allocator().destroy_range(first, self.len);
        }
        // `buf` frees the memory
    }
}

impl<T, A: Allocator> Deref for Vec<T, A> {
    type Target = [T];
    #[inline]
    fn deref(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }
}

impl<T, A: Allocator> DerefMut for Vec<T, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }
}

impl<T, I: SliceIndex<[T]>, A: Allocator> Index<I> for Vec<T, A> {
    type Output = I::Output;
    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(&**self, index)
    }
}

impl<T, I: SliceIndex<[T]>, A: Allocator> IndexMut<I> for Vec<T, A> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(&mut **self, index)
    }
}

impl<T, A: Allocator> AsRef<[T]> for Vec<T, A> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, A: Allocator> AsMut<[T]> for Vec<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Vec<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T: Hash, A: Allocator> Hash for Vec<T, A> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        Hash::hash(&**self, state)
    }
}

impl<T, U, A1, A2> PartialEq<Vec<U, A2>> for Vec<T, A1>
where
    T: PartialEq<U>,
    A1: Allocator,
    A2: Allocator,
{
    #[inline]
    fn eq(&self, other: &Vec<U, A2>) -> bool {
        self[..] == other[..]
    }
}

impl<T: Eq, A: Allocator> Eq for Vec<T, A> {}

impl<T: PartialEq<U>, U, A: Allocator> PartialEq<[U]> for Vec<T, A> {
    #[inline]
    fn eq(&self, other: &[U]) -> bool {
        self[..] == other[..]
    }
}

impl<T: PartialEq<U>, U, A: Allocator> PartialEq<&[U]> for Vec<T, A> {
    #[inline]
    fn eq(&self, other: &&[U]) -> bool {
        self[..] == other[..]
    }
}

impl<T: PartialEq<U>, U, A: Allocator> PartialEq<&mut [U]> for Vec<T, A> {
    #[inline]
    fn eq(&self, other: &&mut [U]) -> bool {
        self[..] == other[..]
    }
}

impl<T: PartialEq<U>, U, A: Allocator, const N: usize> PartialEq<[U; N]> for Vec<T, A> {
    #[inline]
    fn eq(&self, other: &[U; N]) -> bool {
        self[..] == other[..]
    }
}

impl<T: PartialEq<U>, U, A: Allocator, const N: usize> PartialEq<&[U; N]> for Vec<T, A> {
    #[inline]
    fn eq(&self, other: &&[U; N]) -> bool {
        self[..] == other[..]
    }
}

impl<T: PartialOrd, A: Allocator> PartialOrd for Vec<T, A> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        PartialOrd::partial_cmp(&**self, &**other)
    }
}

impl<T: Ord, A: Allocator> Ord for Vec<T, A> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        Ord::cmp(&**self, &**other)
    }
}

impl<T, A: Allocator> Extend<T> for Vec<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve_for(lower);
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for Vec<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

impl<T> FromIterator<T> for Vec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut ret = Vec::new();
        ret.extend(iter);
        ret
    }
}

impl<T, const N: usize> From<[T; N]> for Vec<T> {
    /// Moves the elements of an array into a vector of capacity `N`.
    fn from(source: [T; N]) -> Self {
        let mut ret = Vec::with_capacity(N);
        ret.extend(source);
        ret
    }
}

impl<T: Clone> From<&[T]> for Vec<T> {
    fn from(source: &[T]) -> Self {
        let mut ret = Vec::with_capacity(source.len());
        ret.extend_from_slice(source);
        ret
    }
}

impl<T: Clone> From<&mut [T]> for Vec<T> {
    fn from(source: &mut [T]) -> Self {
        Self::from(&*source)
    }
}

/// An iterator that moves out of a vector.
///
/// This `struct` is created by the `into_iter` method on [`Vec`] (provided by
/// the [`IntoIterator`] trait).
///
/// # Example
/// ```
/// let vec = vessel::Vec::from([1, 2, 3]);
/// let mut iter: vessel::vec::IntoIter<_> = vec.into_iter();
/// assert_eq!(iter.next(), Some(1));
/// assert_eq!(iter.next_back(), Some(3));
/// assert_eq!(iter.as_slice(), &[2]);
/// ```
pub struct IntoIter<T, A: Allocator = Global> {
    buf: RawBuf<T, A>,
    start: usize,
    end: usize,
}

impl<T, A: Allocator> IntoIter<T, A> {
    /// Returns the remaining items of this iterator as a slice.
    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.ptr().add(self.start), self.end - self.start) }
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.end - self.start;
        (size, Some(size))
    }

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.start >= self.end {
            return None;
        }

        let ret = unsafe { self.buf.slot(self.start).as_ptr().read() };
        self.start += 1;
        Some(ret)
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start >= self.end {
            return None;
        }

        self.end -= 1;
        unsafe { Some(self.buf.slot(self.end).as_ptr().read()) }
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}
impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        let remaining = self.end - self.start;
        self.end = self.start;
        unsafe {
            let first = self.buf.slot(self.start);
            self.buf.allocator().destroy_range(first, remaining);
        }
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: Allocator> IntoIterator for Vec<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> Self::IntoIter {
        let this = ManuallyDrop::new(self);
        let buf = unsafe { ptr::read(&this.buf) };

        IntoIter {
            buf,
            start: 0,
            end: this.len,
        }
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a Vec<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut Vec<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
