use core::{fmt, ops::Deref};

use crate::Buffer;

/// A type that writes its own JSON.
///
/// Fields tagged with the `encoder` option delegate to this trait instead of
/// the encoder's generic handling. The implementation must append exactly one
/// complete JSON value.
///
/// ```
/// use stencil_core::{Buffer, EncodeJson};
///
/// struct Point(i32, i32);
///
/// impl EncodeJson for Point {
///     fn encode_json(&self, out: &mut Buffer) {
///         use core::fmt::Write;
///         let _ = write!(out, "[{},{}]", self.0, self.1);
///     }
/// }
/// ```
pub trait EncodeJson {
    /// Appends the JSON encoding of `self` to `out`.
    fn encode_json(&self, out: &mut Buffer);
}

impl<T: EncodeJson + ?Sized> EncodeJson for &T {
    fn encode_json(&self, out: &mut Buffer) {
        (**self).encode_json(out)
    }
}

/// A string that is always JSON-escaped when encoded.
///
/// Plain `String`s are written verbatim between quotes. Wrap text that may
/// contain quotes, backslashes or control characters in `EscapedString`, or
/// tag the field with the `escape` option.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EscapedString(pub String);

impl EscapedString {
    /// Wraps a string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The wrapped text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for EscapedString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<String> for EscapedString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EscapedString {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for EscapedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
