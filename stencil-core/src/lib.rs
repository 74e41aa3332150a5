#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod ptr;
pub use ptr::PtrConst;

mod shape;
pub use shape::*;

mod def;
pub use def::*;

mod buffer;
pub use buffer::{Buffer, KeySpan};

mod pool;
pub use pool::BufferPool;

mod encode;
pub use encode::{EncodeJson, EscapedString};

pub mod spez;

mod macros;

mod impls_core;
mod impls_alloc;
mod impls_std;

#[cfg(feature = "indexmap")]
mod impls_indexmap;

#[cfg(feature = "time")]
mod impls_time;

/// A type whose structure can be described by a static [`Shape`].
///
/// # Safety
///
/// `SHAPE` must describe `Self` exactly: its layout, its [`Def`], and every
/// accessor in it must treat the [`PtrConst`] it receives as a pointer to a
/// live value of the type it claims. Encoders dereference those pointers
/// without further checks.
pub unsafe trait Shaped: 'static {
    /// The shape of this type.
    const SHAPE: &'static Shape;
}

/// Returns the shape of `T`.
///
/// Used as a `fn() -> &'static Shape` wherever shapes refer to other shapes,
/// so that self-referential types can be described.
#[inline]
pub fn shape_of<T: Shaped>() -> &'static Shape {
    T::SHAPE
}
