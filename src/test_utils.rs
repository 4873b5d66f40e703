use crate::allocator::{Allocator, Global};
use crate::{Error, Result};

use alloc::rc::Rc;
use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;

pub(crate) const RNG_SEED: [u8; 32] = [
    0x54, 0x32, 0x10, 0x12, 0x34, 0x54, 0x32, 0x10, 0x0b, 0xad, 0xf0, 0x0d, 0xde, 0xad, 0xbe, 0xef,
    0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0xfe, 0xdc, 0xba, 0x98, 0x76, 0x54, 0x32, 0x10,
];

#[derive(Clone, Default)]
pub(crate) struct DropCounter {
    count: Rc<Cell<usize>>,
}

impl DropCounter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn dropped(&self) -> usize {
        self.count.get()
    }

    pub(crate) fn new_droppable<T>(&self, value: T) -> Droppable<T> {
        Droppable {
            value,
            counter: self.count.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Droppable<T = usize> {
    pub(crate) value: T,
    counter: Rc<Cell<usize>>,
}

impl<T: PartialEq> PartialEq for Droppable<T> {
    fn eq(&self, rhs: &Self) -> bool {
        self.value == rhs.value
    }
}

impl<T> Drop for Droppable<T> {
    fn drop(&mut self) {
        self.counter.set(self.counter.get() + 1);
    }
}

/// A value whose `clone` panics once `fuse` clones have been made.
#[derive(Debug)]
pub(crate) struct Fused {
    pub(crate) value: usize,
    fuse: Rc<Cell<usize>>,
    _counted: Droppable<()>,
}

impl Fused {
    pub(crate) fn new(value: usize, fuse: &Rc<Cell<usize>>, counter: &DropCounter) -> Self {
        Fused {
            value,
            fuse: fuse.clone(),
            _counted: counter.new_droppable(()),
        }
    }
}

impl Clone for Fused {
    fn clone(&self) -> Self {
        let remaining = self.fuse.get();
        if remaining == 0 {
            panic!("fuse burnt down");
        }
        self.fuse.set(remaining - 1);

        Fused {
            value: self.value,
            fuse: self.fuse.clone(),
            _counted: self._counted.clone(),
        }
    }
}

std::thread_local! {
    static LIVE_ALLOCATIONS: Cell<usize> = Cell::new(0);
    static FAIL_NEXT: Cell<bool> = Cell::new(false);
}

/// Forwards to [`Global`], counting live blocks per thread and optionally
/// refusing the next request.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Tracking;

impl Tracking {
    pub(crate) fn live() -> usize {
        LIVE_ALLOCATIONS.with(Cell::get)
    }

    pub(crate) fn fail_next_allocation() {
        FAIL_NEXT.with(|f| f.set(true));
    }
}

unsafe impl Allocator for Tracking {
    fn allocate_raw(&self, layout: Layout) -> Result<NonNull<u8>> {
        if FAIL_NEXT.with(|f| f.replace(false)) {
            return Err(Error::AllocFailed { layout });
        }

        let ptr = Global.allocate_raw(layout)?;
        LIVE_ALLOCATIONS.with(|n| n.set(n.get() + 1));
        Ok(ptr)
    }

    unsafe fn deallocate_raw(&self, ptr: NonNull<u8>, layout: Layout) {
        LIVE_ALLOCATIONS.with(|n| n.set(n.get() - 1));
        Global.deallocate_raw(ptr, layout);
    }
}
