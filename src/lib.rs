#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/vessel/0.1.0")]

//! Growable contiguous arrays over pluggable element allocators.
//!
//! [`Vec`] keeps its elements in one buffer obtained from an [`Allocator`],
//! growing it geometrically so that appending is amortized O(1). Growth and
//! splicing are transactional: when allocating or constructing an element
//! fails partway through, the vector is left exactly as it was.
//!
//! The allocator is a strategy object separating raw allocation from the
//! construction and destruction of individual elements. [`Global`] forwards
//! to the global allocator and is the default.
//!
//! ```
//! use vessel::Vec;
//!
//! let mut v = Vec::from([10, 20, 30]);
//! v.reserve(10);
//! v.insert(0, 5);
//! v.insert(2, 15);
//! v.insert(v.len(), 35);
//! assert_eq!(v, [5, 10, 15, 20, 30, 35]);
//!
//! let next = v.erase_range(1..4);
//! assert_eq!(v, [5, 30, 35]);
//! assert_eq!(v[next], 30);
//! ```

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

use core::alloc::Layout;
use core::fmt::{self, Display, Formatter};

pub mod allocator;
mod raw;
pub mod vec;

#[cfg(test)]
mod test_utils;

pub use crate::allocator::{Allocator, Global};
pub use crate::vec::Vec;

/// The error type for fallible vector and allocator operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A checked access named a position at or past the end of the vector.
    OutOfRange {
        /// The requested position.
        index: usize,
        /// The length of the vector at the time of the access.
        len: usize,
    },
    /// The requested capacity exceeds what the allocator can address.
    CapacityOverflow,
    /// The allocator could not satisfy a request for `layout`.
    AllocFailed {
        /// The layout of the failed request.
        layout: Layout,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRange { index, len } => {
                write!(f, "index (is {}) should be < len (is {})", index, len)
            }
            Error::CapacityOverflow => f.write_str("capacity overflow"),
            Error::AllocFailed { layout } => write!(
                f,
                "memory allocation of {} bytes (align {}) failed",
                layout.size(),
                layout.align()
            ),
        }
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
impl std::error::Error for Error {}

/// Shorthand for `core::result::Result<T, vessel::Error>`.
pub type Result<T> = core::result::Result<T, Error>;

/// Diverges with the appropriate failure for an infallible operation.
#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn handle_error(error: Error) -> ! {
    match error {
        Error::AllocFailed { layout } => alloc::alloc::handle_alloc_error(layout),
        other => panic!("{}", other),
    }
}
