use core::{alloc::Layout, any::TypeId};
use std::{
    collections::{BTreeMap, VecDeque},
    rc::Rc,
    sync::Arc,
};

use crate::{
    Def, EscapedString, ListDef, ListVTable, MapDef, MapVTable, PointerDef, PtrConst,
    ScalarType, Shape, Shaped, ValueVTable, shape_of,
};

unsafe impl Shaped for String {
    const SHAPE: &'static Shape = &Shape {
        id: TypeId::of::<Self>,
        type_identifier: "String",
        type_name: core::any::type_name::<Self>,
        layout: Layout::new::<Self>(),
        def: Def::Scalar(ScalarType::String),
        vtable: ValueVTable::EMPTY,
    };
}

unsafe impl Shaped for EscapedString {
    const SHAPE: &'static Shape = &Shape {
        id: TypeId::of::<Self>,
        type_identifier: "EscapedString",
        type_name: core::any::type_name::<Self>,
        layout: Layout::new::<Self>(),
        def: Def::Scalar(ScalarType::EscapedString),
        vtable: ValueVTable::EMPTY,
    };
}

unsafe fn vec_len<T>(ptr: PtrConst) -> usize {
    unsafe { ptr.get::<Vec<T>>() }.len()
}

unsafe fn vec_get<T>(ptr: PtrConst, index: usize) -> PtrConst {
    PtrConst::new(&unsafe { ptr.get::<Vec<T>>() }[index])
}

unsafe impl<T: Shaped> Shaped for Vec<T> {
    const SHAPE: &'static Shape = &Shape {
        id: TypeId::of::<Self>,
        type_identifier: "Vec",
        type_name: core::any::type_name::<Self>,
        layout: Layout::new::<Self>(),
        def: Def::List(ListDef {
            vtable: ListVTable {
                len: vec_len::<T>,
                get: vec_get::<T>,
            },
            t: shape_of::<T>,
        }),
        vtable: ValueVTable::EMPTY,
    };
}

unsafe fn vec_deque_len<T>(ptr: PtrConst) -> usize {
    unsafe { ptr.get::<VecDeque<T>>() }.len()
}

unsafe fn vec_deque_get<T>(ptr: PtrConst, index: usize) -> PtrConst {
    PtrConst::new(&unsafe { ptr.get::<VecDeque<T>>() }[index])
}

unsafe impl<T: Shaped> Shaped for VecDeque<T> {
    const SHAPE: &'static Shape = &Shape {
        id: TypeId::of::<Self>,
        type_identifier: "VecDeque",
        type_name: core::any::type_name::<Self>,
        layout: Layout::new::<Self>(),
        def: Def::List(ListDef {
            vtable: ListVTable {
                len: vec_deque_len::<T>,
                get: vec_deque_get::<T>,
            },
            t: shape_of::<T>,
        }),
        vtable: ValueVTable::EMPTY,
    };
}

unsafe fn btreemap_for_each<K, V>(ptr: PtrConst, f: &mut dyn FnMut(PtrConst, PtrConst)) {
    for (k, v) in unsafe { ptr.get::<BTreeMap<K, V>>() } {
        f(PtrConst::new(k), PtrConst::new(v));
    }
}

unsafe impl<K: Shaped, V: Shaped> Shaped for BTreeMap<K, V> {
    const SHAPE: &'static Shape = &Shape {
        id: TypeId::of::<Self>,
        type_identifier: "BTreeMap",
        type_name: core::any::type_name::<Self>,
        layout: Layout::new::<Self>(),
        def: Def::Map(MapDef {
            vtable: MapVTable {
                for_each: btreemap_for_each::<K, V>,
            },
            k: shape_of::<K>,
            v: shape_of::<V>,
        }),
        vtable: ValueVTable::EMPTY,
    };
}

macro_rules! pointer_shape {
    ($($ptr:ident),* $(,)?) => {
        $(
            unsafe impl<T: Shaped> Shaped for $ptr<T> {
                const SHAPE: &'static Shape = &Shape {
                    id: TypeId::of::<Self>,
                    type_identifier: stringify!($ptr),
                    type_name: core::any::type_name::<Self>,
                    layout: Layout::new::<Self>(),
                    def: Def::Pointer(PointerDef {
                        borrow: {
                            unsafe fn borrow<U>(ptr: PtrConst) -> PtrConst {
                                PtrConst::new(&**unsafe { ptr.get::<$ptr<U>>() })
                            }
                            borrow::<T>
                        },
                        t: shape_of::<T>,
                    }),
                    vtable: ValueVTable::EMPTY,
                };
            }
        )*
    };
}

pointer_shape!(Box, Rc, Arc);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShapeKind;
    use stencil_testhelpers::test;

    #[test]
    fn containers_describe_their_elements() {
        let Def::List(list) = <Vec<Option<u8>>>::SHAPE.def else {
            panic!("expected a list");
        };
        assert_eq!(list.t().kind(), ShapeKind::Nullable);

        let Def::Map(map) = <BTreeMap<String, Vec<i64>>>::SHAPE.def else {
            panic!("expected a map");
        };
        assert!(map.k().is_type::<String>());
        assert_eq!(map.v().kind(), ShapeKind::Sequence);

        let Def::Pointer(ptr) = <Arc<u32>>::SHAPE.def else {
            panic!("expected a pointer");
        };
        assert!(ptr.t().is_type::<u32>());
    }

    #[test]
    fn accessors_reach_the_values() {
        let values = vec![String::from("a"), String::from("b")];
        let Def::List(list) = <Vec<String>>::SHAPE.def else {
            panic!("expected a list");
        };
        let ptr = PtrConst::new(&values);
        unsafe {
            assert_eq!((list.vtable.len)(ptr), 2);
            assert_eq!((list.vtable.get)(ptr, 1).get::<String>(), "b");
        }

        let boxed = Box::new(7u16);
        let Def::Pointer(def) = <Box<u16>>::SHAPE.def else {
            panic!("expected a pointer");
        };
        unsafe {
            assert_eq!(*(def.borrow)(PtrConst::new(&boxed)).get::<u16>(), 7);
        }
    }
}
