/// Evaluates to `true` if `$ty` implements `$trait`, as a `const bool`.
///
/// Only meaningful for concrete types: inside a generic context the answer
/// depends on the bounds in scope, not on the eventual type.
#[doc(hidden)]
#[macro_export]
macro_rules! __impls {
    ($ty:ty: $trait:path) => {{
        trait DoesNotImpl {
            const IMPLS: bool = false;
        }
        impl<T: ?Sized> DoesNotImpl for T {}

        struct Wrapper<T: ?Sized>(::core::marker::PhantomData<T>);

        #[allow(dead_code)]
        impl<T: ?Sized + $trait> Wrapper<T> {
            const IMPLS: bool = true;
        }

        <Wrapper<$ty>>::IMPLS
    }};
}

/// Builds the `ValueVTable` of a concrete type from the capabilities it has.
#[doc(hidden)]
#[macro_export]
macro_rules! __value_vtable {
    ($ty:ty) => {
        $crate::ValueVTable {
            display: {
                unsafe fn display(
                    ptr: $crate::PtrConst,
                    f: &mut ::core::fmt::Formatter<'_>,
                ) -> ::core::fmt::Result {
                    use $crate::spez::*;
                    (&&Spez(unsafe { ptr.get::<$ty>() })).spez_display(f)
                }
                if $crate::__impls!($ty: ::core::fmt::Display) {
                    ::core::option::Option::Some(display as $crate::DisplayFn)
                } else {
                    ::core::option::Option::None
                }
            },
            encode_json: {
                unsafe fn encode_json(ptr: $crate::PtrConst, out: &mut $crate::Buffer) {
                    use $crate::spez::*;
                    (&&Spez(unsafe { ptr.get::<$ty>() })).spez_encode_json(out)
                }
                if $crate::__impls!($ty: $crate::EncodeJson) {
                    ::core::option::Option::Some(encode_json as $crate::EncodeJsonFn)
                } else {
                    ::core::option::Option::None
                }
            },
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __tag {
    () => {
        ::core::option::Option::None
    };
    ($tag:literal) => {
        ::core::option::Option::Some($tag)
    };
}

/// Declares a struct together with its [`Shaped`](crate::Shaped) impl.
///
/// Each field may carry an annotation after `=>`: the JSON key, optionally
/// followed by comma-separated options (`stringer`, `encoder`, `raw`,
/// `escape`). Fields without an annotation, or with an empty key, are not
/// encoded.
///
/// If the struct implements `Display` or
/// [`EncodeJson`](crate::EncodeJson), its shape records that, so fields of
/// this type can use the `stringer` and `encoder` options and maps can use
/// it as a key.
///
/// ```
/// stencil_core::record! {
///     #[derive(Debug, Clone)]
///     pub struct Person {
///         pub name: String => "name",
///         pub age: u32 => "age",
///         pub nickname: Option<String> => "nickname,escape",
///         internal_id: u64,
///     }
/// }
///
/// use stencil_core::{Def, Shaped};
/// let Def::Struct(record) = Person::SHAPE.def else { unreachable!() };
/// assert_eq!(record.fields.len(), 4);
/// assert_eq!(record.fields[2].tag, Some("nickname,escape"));
/// assert_eq!(record.fields[3].tag, None);
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $fname:ident : $fty:ty $(=> $tag:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $fname: $fty,
            )*
        }

        unsafe impl $crate::Shaped for $name {
            const SHAPE: &'static $crate::Shape = &$crate::Shape {
                id: ::core::any::TypeId::of::<$name>,
                type_identifier: ::core::stringify!($name),
                type_name: ::core::any::type_name::<$name>,
                layout: ::core::alloc::Layout::new::<$name>(),
                def: $crate::Def::Struct($crate::StructDef {
                    fields: &[
                        $(
                            $crate::Field {
                                name: ::core::stringify!($fname),
                                tag: $crate::__tag!($($tag)?),
                                shape: $crate::shape_of::<$fty>,
                                get: {
                                    unsafe fn get(base: $crate::PtrConst) -> $crate::PtrConst {
                                        let record = unsafe { base.get::<$name>() };
                                        $crate::PtrConst::new(&record.$fname)
                                    }
                                    get
                                },
                            },
                        )*
                    ],
                }),
                vtable: $crate::__value_vtable!($name),
            };
        }
    };
}

/// Implements [`Shaped`](crate::Shaped) for a type with no JSON structure of
/// its own.
///
/// An opaque value is encoded through its capabilities only: with its
/// [`EncodeJson`](crate::EncodeJson) impl if it has one, otherwise as a
/// quoted string from its `Display` impl. A type with neither fails to
/// compile into an encoder.
///
/// ```
/// use core::fmt;
///
/// pub struct Cents(pub u64);
///
/// impl fmt::Display for Cents {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
///     }
/// }
///
/// stencil_core::opaque!(Cents);
/// ```
#[macro_export]
macro_rules! opaque {
    ($($ty:ty),+ $(,)?) => {
        $(
            unsafe impl $crate::Shaped for $ty {
                const SHAPE: &'static $crate::Shape = &$crate::Shape {
                    id: ::core::any::TypeId::of::<$ty>,
                    type_identifier: ::core::stringify!($ty),
                    type_name: ::core::any::type_name::<$ty>,
                    layout: ::core::alloc::Layout::new::<$ty>(),
                    def: $crate::Def::Opaque,
                    vtable: $crate::__value_vtable!($ty),
                };
            }
        )+
    };
}
