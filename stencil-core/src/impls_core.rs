use core::{alloc::Layout, any::TypeId};

use crate::{
    ArrayDef, Def, ListDef, ListVTable, OptionDef, PtrConst, ScalarType, Shape, Shaped,
    UnsupportedKind, ValueVTable, shape_of,
};

macro_rules! scalar_shape {
    ($($ty:ty => $scalar:ident),* $(,)?) => {
        $(
            unsafe impl Shaped for $ty {
                const SHAPE: &'static Shape = &Shape {
                    id: TypeId::of::<$ty>,
                    type_identifier: stringify!($ty),
                    type_name: core::any::type_name::<$ty>,
                    layout: Layout::new::<$ty>(),
                    def: Def::Scalar(ScalarType::$scalar),
                    vtable: ValueVTable::EMPTY,
                };
            }
        )*
    };
}

scalar_shape! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => ISize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => USize,
    f32 => F32,
    f64 => F64,
    char => Char,
    &'static str => Str,
}

unsafe fn option_get<T>(ptr: PtrConst) -> Option<PtrConst> {
    unsafe { ptr.get::<Option<T>>() }.as_ref().map(PtrConst::new)
}

unsafe impl<T: Shaped> Shaped for Option<T> {
    const SHAPE: &'static Shape = &Shape {
        id: TypeId::of::<Self>,
        type_identifier: "Option",
        type_name: core::any::type_name::<Self>,
        layout: Layout::new::<Self>(),
        def: Def::Option(OptionDef {
            get: option_get::<T>,
            t: shape_of::<T>,
        }),
        vtable: ValueVTable::EMPTY,
    };
}

unsafe fn array_get<T, const N: usize>(ptr: PtrConst, index: usize) -> PtrConst {
    PtrConst::new(&unsafe { ptr.get::<[T; N]>() }[index])
}

unsafe impl<T: Shaped, const N: usize> Shaped for [T; N] {
    const SHAPE: &'static Shape = &Shape {
        id: TypeId::of::<Self>,
        type_identifier: "[T; N]",
        type_name: core::any::type_name::<Self>,
        layout: Layout::new::<Self>(),
        def: Def::Array(ArrayDef {
            n: N,
            get: array_get::<T, N>,
            t: shape_of::<T>,
        }),
        vtable: ValueVTable::EMPTY,
    };
}

unsafe fn slice_len<T>(ptr: PtrConst) -> usize {
    unsafe { ptr.get::<&[T]>() }.len()
}

unsafe fn slice_get<T>(ptr: PtrConst, index: usize) -> PtrConst {
    PtrConst::new(&unsafe { ptr.get::<&[T]>() }[index])
}

unsafe impl<T: Shaped> Shaped for &'static [T] {
    const SHAPE: &'static Shape = &Shape {
        id: TypeId::of::<Self>,
        type_identifier: "&[T]",
        type_name: core::any::type_name::<Self>,
        layout: Layout::new::<Self>(),
        def: Def::List(ListDef {
            vtable: ListVTable {
                len: slice_len::<T>,
                get: slice_get::<T>,
            },
            t: shape_of::<T>,
        }),
        vtable: ValueVTable::EMPTY,
    };
}

macro_rules! unsupported_shape {
    ($kind:ident, $ident:literal; $($ty:ty $(, $param:ident)*);* $(;)?) => {
        $(
            unsafe impl<$($param: 'static),*> Shaped for $ty {
                const SHAPE: &'static Shape = &Shape {
                    id: TypeId::of::<Self>,
                    type_identifier: $ident,
                    type_name: core::any::type_name::<Self>,
                    layout: Layout::new::<Self>(),
                    def: Def::Unsupported(UnsupportedKind::$kind),
                    vtable: ValueVTable::EMPTY,
                };
            }
        )*
    };
}

unsupported_shape! {
    RawPointer, "*const T";
    *const T, T;
}

unsupported_shape! {
    RawPointer, "*mut T";
    *mut T, T;
}

unsupported_shape! {
    Function, "fn";
    fn() -> R, R;
    fn(A) -> R, A, R;
    fn(A, B) -> R, A, B, R;
    fn(A, B, C) -> R, A, B, C, R;
}
