//! Auto-deref specialization helpers.
//!
//! The `record!` and `opaque!` macros expand to shapes for concrete types and
//! need to fill in a capability only when the type has it. [`__impls!`]
//! answers "does this type implement the trait" as a `const bool`, and the
//! `Spez*` traits give a call that compiles either way: method resolution on
//! `(&&Spez(value))` picks the `Yes` impl when the bound holds and falls back
//! to the `No` impl otherwise. The `No` branch is never reached because the
//! capability is only installed when the `const bool` is true.
//!
//! [`__impls!`]: crate::__impls

use core::fmt;

use crate::{Buffer, EncodeJson};

/// Wrapper type used for auto-deref specialization.
pub struct Spez<T>(pub T);

/// `Display` when the wrapped type implements it.
pub trait SpezDisplayYes {
    /// Delegates to `Display::fmt`.
    fn spez_display(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: fmt::Display + ?Sized> SpezDisplayYes for &Spez<&T> {
    fn spez_display(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.0, f)
    }
}

/// Fallback when the wrapped type does not implement `Display`.
pub trait SpezDisplayNo {
    /// Never called.
    fn spez_display(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: ?Sized> SpezDisplayNo for Spez<&T> {
    fn spez_display(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        unreachable!()
    }
}

/// `EncodeJson` when the wrapped type implements it.
pub trait SpezEncodeJsonYes {
    /// Delegates to `EncodeJson::encode_json`.
    fn spez_encode_json(&self, out: &mut Buffer);
}

impl<T: EncodeJson + ?Sized> SpezEncodeJsonYes for &Spez<&T> {
    fn spez_encode_json(&self, out: &mut Buffer) {
        self.0.encode_json(out)
    }
}

/// Fallback when the wrapped type does not implement `EncodeJson`.
pub trait SpezEncodeJsonNo {
    /// Never called.
    fn spez_encode_json(&self, out: &mut Buffer);
}

impl<T: ?Sized> SpezEncodeJsonNo for Spez<&T> {
    fn spez_encode_json(&self, _out: &mut Buffer) {
        unreachable!()
    }
}

#[cfg(test)]
mod tests {
    use stencil_testhelpers::test;

    struct Plain;

    #[test]
    fn detects_implemented_traits() {
        assert!(crate::__impls!(u32: core::fmt::Display));
        assert!(!crate::__impls!(Plain: core::fmt::Display));
        assert!(crate::__impls!(crate::EscapedString: core::fmt::Display));
        assert!(!crate::__impls!(Plain: crate::EncodeJson));
    }
}
