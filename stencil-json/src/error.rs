use core::fmt;

use stencil_core::{Shape, ShapeKind};

/// Error returned when a shape cannot be compiled into an encoder.
///
/// Compilation either succeeds completely or fails with the first field,
/// element or key it cannot handle. Compiling the same shape again fails the
/// same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    /// What went wrong.
    pub kind: CompileErrorKind,

    /// Record fields leading from the root type to the failure, outermost
    /// first. Empty when the root type itself failed.
    pub path: Vec<&'static str>,
}

/// The reason a [`CompileError`] occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileErrorKind {
    /// A field, element or value has no JSON representation.
    Unsupported {
        /// The offending type.
        type_name: &'static str,
        /// Its kind.
        kind: ShapeKind,
    },

    /// A map key type cannot be rendered as text.
    UnsupportedKey {
        /// The key type.
        type_name: &'static str,
        /// Its kind.
        kind: ShapeKind,
    },

    /// A field option does not apply to the field's type.
    UnsupportedOption {
        /// The option, as written in the annotation.
        option: &'static str,
        /// The field's type.
        type_name: &'static str,
    },

    /// The root type is not of the kind the encoder was asked for.
    ShapeMismatch {
        /// What the caller asked for.
        expected: &'static str,
        /// The root type.
        type_name: &'static str,
        /// Its kind.
        kind: ShapeKind,
    },
}

impl CompileError {
    pub(crate) fn new(kind: CompileErrorKind) -> Self {
        Self {
            kind,
            path: Vec::new(),
        }
    }

    pub(crate) fn unsupported(shape: &Shape) -> Self {
        Self::new(CompileErrorKind::Unsupported {
            type_name: shape.type_name(),
            kind: shape.kind(),
        })
    }

    pub(crate) fn unsupported_key(shape: &Shape) -> Self {
        Self::new(CompileErrorKind::UnsupportedKey {
            type_name: shape.type_name(),
            kind: shape.kind(),
        })
    }

    pub(crate) fn unsupported_option(option: &'static str, shape: &Shape) -> Self {
        Self::new(CompileErrorKind::UnsupportedOption {
            option,
            type_name: shape.type_name(),
        })
    }

    pub(crate) fn shape_mismatch(expected: &'static str, shape: &Shape) -> Self {
        Self::new(CompileErrorKind::ShapeMismatch {
            expected,
            type_name: shape.type_name(),
            kind: shape.kind(),
        })
    }

    /// Records that the error happened inside `field`.
    pub(crate) fn in_field(mut self, field: &'static str) -> Self {
        self.path.insert(0, field);
        self
    }
}

impl fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileErrorKind::Unsupported { type_name, kind } => {
                write!(f, "unsupported type `{type_name}` ({kind})")
            }
            CompileErrorKind::UnsupportedKey { type_name, kind } => {
                write!(f, "unsupported map key type `{type_name}` ({kind})")
            }
            CompileErrorKind::UnsupportedOption { option, type_name } => {
                write!(f, "option `{option}` does not apply to `{type_name}`")
            }
            CompileErrorKind::ShapeMismatch {
                expected,
                type_name,
                kind,
            } => write!(f, "expected a {expected}, but `{type_name}` is a {kind}"),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)?;
        if !self.path.is_empty() {
            write!(f, " at `{}`", self.path.join("."))?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileError {}
