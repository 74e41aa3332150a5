//! Opaque pointers
//!
//! Type-erased pointer used by shape accessors and compiled encoders.

use core::{fmt, ptr::NonNull};

/// A type-erased, read-only pointer to a value.
///
/// `PtrConst` carries no lifetime: whoever produces one from a reference is
/// responsible for keeping the referent alive while the pointer is in use.
/// Accessors in a [`Shape`](crate::Shape) receive and return `PtrConst`s that
/// are only valid for the duration of a single encode call.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PtrConst(NonNull<u8>);

// A `PtrConst` is an address. Reading through it is already `unsafe`.
unsafe impl Send for PtrConst {}
unsafe impl Sync for PtrConst {}

impl fmt::Debug for PtrConst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.as_ptr().fmt(f)
    }
}

impl PtrConst {
    /// Creates a pointer to `value`.
    #[inline]
    pub fn new<T: ?Sized>(value: &T) -> Self {
        Self(NonNull::from(value).cast::<u8>())
    }

    /// Borrows the pointee as a `T`.
    ///
    /// # Safety
    ///
    /// The pointer must point to a live, properly aligned `T`, and the
    /// returned reference must not outlive it.
    #[inline]
    pub unsafe fn get<'a, T>(self) -> &'a T {
        unsafe { self.0.cast::<T>().as_ref() }
    }
}
