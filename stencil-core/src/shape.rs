use core::{alloc::Layout, any::TypeId, fmt};

use crate::{Buffer, Def, EncodeJson, PtrConst, UnsupportedKind};

/// Renders the value behind a pointer through its `Display` impl.
pub type DisplayFn = unsafe fn(PtrConst, &mut fmt::Formatter<'_>) -> fmt::Result;

/// Appends the JSON encoding of the value behind a pointer to a buffer.
pub type EncodeJsonFn = unsafe fn(PtrConst, &mut Buffer);

/// Static description of a type.
///
/// Shapes are built in const context and live for the whole program. They
/// are never mutated; encoders read them once, while compiling.
#[derive(Clone, Copy)]
pub struct Shape {
    /// Returns the `TypeId` of the described type.
    pub id: fn() -> TypeId,

    /// Short, unqualified name such as `Vec` or `Person`.
    pub type_identifier: &'static str,

    /// Full type name as reported by `core::any::type_name`.
    pub type_name: fn() -> &'static str,

    /// Size and alignment.
    pub layout: Layout,

    /// What the type is structurally.
    pub def: Def,

    /// Optional per-type capabilities.
    pub vtable: ValueVTable,
}

impl Shape {
    /// `TypeId` of the described type.
    #[inline]
    pub fn id(&self) -> TypeId {
        (self.id)()
    }

    /// Returns true if this shape describes `T`.
    #[inline]
    pub fn is_type<T: 'static>(&self) -> bool {
        self.id() == TypeId::of::<T>()
    }

    /// Full type name, e.g. `alloc::vec::Vec<u8>`.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// The structural kind of this shape.
    pub fn kind(&self) -> ShapeKind {
        match self.def {
            Def::Scalar(_) => ShapeKind::Scalar,
            Def::Struct(_) => ShapeKind::Record,
            Def::List(_) => ShapeKind::Sequence,
            Def::Array(_) => ShapeKind::Array,
            Def::Map(_) => ShapeKind::Mapping,
            Def::Option(_) => ShapeKind::Nullable,
            Def::Pointer(_) => ShapeKind::Pointer,
            Def::Opaque => ShapeKind::Opaque,
            Def::Unsupported(kind) => ShapeKind::Unsupported(kind),
        }
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Shape {}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("type_name", &self.type_name())
            .field("kind", &self.kind())
            .field("size", &self.layout.size())
            .finish()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Coarse classification of a [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Booleans, numbers, characters and strings.
    Scalar,
    /// A struct with named fields.
    Record,
    /// A variable-length list.
    Sequence,
    /// A fixed-size array.
    Array,
    /// A key-value map.
    Mapping,
    /// A value that may be absent (`Option<T>`).
    Nullable,
    /// An owning smart pointer (`Box`, `Rc`, `Arc`).
    Pointer,
    /// A type with no structure of its own, only capabilities.
    Opaque,
    /// A type that has no JSON representation.
    Unsupported(UnsupportedKind),
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Scalar => f.write_str("scalar"),
            ShapeKind::Record => f.write_str("record"),
            ShapeKind::Sequence => f.write_str("sequence"),
            ShapeKind::Array => f.write_str("array"),
            ShapeKind::Mapping => f.write_str("mapping"),
            ShapeKind::Nullable => f.write_str("nullable"),
            ShapeKind::Pointer => f.write_str("pointer"),
            ShapeKind::Opaque => f.write_str("opaque"),
            ShapeKind::Unsupported(kind) => fmt::Display::fmt(kind, f),
        }
    }
}

/// Capabilities a type may expose beyond its structure.
#[derive(Clone, Copy, Default)]
pub struct ValueVTable {
    /// Textual representation, from `core::fmt::Display`.
    pub display: Option<DisplayFn>,

    /// Self-encoding, from [`EncodeJson`].
    pub encode_json: Option<EncodeJsonFn>,
}

impl ValueVTable {
    /// A vtable with no capabilities.
    pub const EMPTY: Self = Self {
        display: None,
        encode_json: None,
    };
}
