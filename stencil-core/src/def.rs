use core::fmt;

use crate::{PtrConst, Shape};

/// Projects a record pointer to one of its fields.
pub type FieldGetFn = unsafe fn(PtrConst) -> PtrConst;

/// Returns the number of elements of a list.
pub type LenFn = unsafe fn(PtrConst) -> usize;

/// Returns a pointer to the element at an index.
pub type IndexFn = unsafe fn(PtrConst, usize) -> PtrConst;

/// Visits every entry of a map in its native iteration order.
pub type ForEachEntryFn = unsafe fn(PtrConst, &mut dyn FnMut(PtrConst, PtrConst));

/// Returns the pointee of an option, or `None` when absent.
pub type OptionGetFn = unsafe fn(PtrConst) -> Option<PtrConst>;

/// Returns the pointee of a smart pointer.
pub type BorrowFn = unsafe fn(PtrConst) -> PtrConst;

/// The structure of a type.
#[derive(Clone, Copy)]
pub enum Def {
    /// A primitive: number, boolean, character or string.
    Scalar(ScalarType),

    /// A record with named fields.
    Struct(StructDef),

    /// A variable-length list.
    List(ListDef),

    /// A fixed-size array.
    Array(ArrayDef),

    /// A key-value map.
    Map(MapDef),

    /// `Option<T>`.
    Option(OptionDef),

    /// An owning smart pointer.
    Pointer(PointerDef),

    /// No structure, only the capabilities in the type's vtable.
    Opaque,

    /// A type with no JSON representation at all.
    Unsupported(UnsupportedKind),
}

/// Primitive types with a canonical JSON rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// `bool`
    Bool,
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `i128`
    I128,
    /// `isize`
    ISize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `u128`
    U128,
    /// `usize`
    USize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `char`
    Char,
    /// `String`
    String,
    /// `&'static str`
    Str,
    /// [`EscapedString`](crate::EscapedString), always escaped on output.
    EscapedString,
}

/// Kinds of types that cannot be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsupportedKind {
    /// `*const T` and `*mut T`
    RawPointer,
    /// `fn(..) -> R`
    Function,
    /// `std::sync::mpsc` endpoints
    Channel,
}

impl fmt::Display for UnsupportedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedKind::RawPointer => f.write_str("raw pointer"),
            UnsupportedKind::Function => f.write_str("function"),
            UnsupportedKind::Channel => f.write_str("channel"),
        }
    }
}

/// Fields of a record, in declaration order.
#[derive(Clone, Copy)]
pub struct StructDef {
    /// All fields, tagged or not.
    pub fields: &'static [Field],
}

/// One record member.
#[derive(Clone, Copy)]
pub struct Field {
    /// Rust name of the field.
    pub name: &'static str,

    /// Annotation string: `"key"` or `"key,option,..."`. Untagged fields are
    /// not encoded.
    pub tag: Option<&'static str>,

    /// Shape of the field's type.
    pub shape: fn() -> &'static Shape,

    /// Typed accessor from the record to this field.
    pub get: FieldGetFn,
}

impl Field {
    /// Shape of the field's type.
    #[inline]
    pub fn shape(&self) -> &'static Shape {
        (self.shape)()
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("shape", &self.shape().type_name())
            .finish()
    }
}

/// A variable-length list such as `Vec<T>`.
#[derive(Clone, Copy)]
pub struct ListDef {
    /// Element access.
    pub vtable: ListVTable,
    /// Shape of the elements.
    pub t: fn() -> &'static Shape,
}

impl ListDef {
    /// Shape of the elements.
    #[inline]
    pub fn t(&self) -> &'static Shape {
        (self.t)()
    }
}

/// Operations on a list.
#[derive(Clone, Copy)]
pub struct ListVTable {
    /// Number of elements.
    pub len: LenFn,
    /// Element at an index. The index must be in bounds.
    pub get: IndexFn,
}

/// A fixed-size array `[T; N]`.
#[derive(Clone, Copy)]
pub struct ArrayDef {
    /// Number of elements.
    pub n: usize,
    /// Element at an index. The index must be below `n`.
    pub get: IndexFn,
    /// Shape of the elements.
    pub t: fn() -> &'static Shape,
}

impl ArrayDef {
    /// Shape of the elements.
    #[inline]
    pub fn t(&self) -> &'static Shape {
        (self.t)()
    }
}

/// A key-value map.
#[derive(Clone, Copy)]
pub struct MapDef {
    /// Entry access.
    pub vtable: MapVTable,
    /// Shape of the keys.
    pub k: fn() -> &'static Shape,
    /// Shape of the values.
    pub v: fn() -> &'static Shape,
}

impl MapDef {
    /// Shape of the keys.
    #[inline]
    pub fn k(&self) -> &'static Shape {
        (self.k)()
    }

    /// Shape of the values.
    #[inline]
    pub fn v(&self) -> &'static Shape {
        (self.v)()
    }
}

/// Operations on a map.
#[derive(Clone, Copy)]
pub struct MapVTable {
    /// Visits every entry as `(key, value)`.
    pub for_each: ForEachEntryFn,
}

/// `Option<T>`.
#[derive(Clone, Copy)]
pub struct OptionDef {
    /// Pointee when present.
    pub get: OptionGetFn,
    /// Shape of `T`.
    pub t: fn() -> &'static Shape,
}

impl OptionDef {
    /// Shape of `T`.
    #[inline]
    pub fn t(&self) -> &'static Shape {
        (self.t)()
    }
}

/// An owning pointer that always has a pointee.
#[derive(Clone, Copy)]
pub struct PointerDef {
    /// The pointee.
    pub borrow: BorrowFn,
    /// Shape of the pointee.
    pub t: fn() -> &'static Shape,
}

impl PointerDef {
    /// Shape of the pointee.
    #[inline]
    pub fn t(&self) -> &'static Shape {
        (self.t)()
    }
}
