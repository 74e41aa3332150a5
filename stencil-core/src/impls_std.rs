use core::{alloc::Layout, any::TypeId};
use std::{
    collections::HashMap,
    sync::mpsc::{Receiver, Sender, SyncSender},
};

use crate::{
    Def, MapDef, MapVTable, PtrConst, Shape, Shaped, UnsupportedKind, ValueVTable, shape_of,
};

unsafe fn hashmap_for_each<K, V, S>(ptr: PtrConst, f: &mut dyn FnMut(PtrConst, PtrConst)) {
    for (k, v) in unsafe { ptr.get::<HashMap<K, V, S>>() } {
        f(PtrConst::new(k), PtrConst::new(v));
    }
}

unsafe impl<K: Shaped, V: Shaped, S: 'static> Shaped for HashMap<K, V, S> {
    const SHAPE: &'static Shape = &Shape {
        id: TypeId::of::<Self>,
        type_identifier: "HashMap",
        type_name: core::any::type_name::<Self>,
        layout: Layout::new::<Self>(),
        def: Def::Map(MapDef {
            vtable: MapVTable {
                for_each: hashmap_for_each::<K, V, S>,
            },
            k: shape_of::<K>,
            v: shape_of::<V>,
        }),
        vtable: ValueVTable::EMPTY,
    };
}

macro_rules! channel_shape {
    ($($chan:ident),* $(,)?) => {
        $(
            unsafe impl<T: 'static> Shaped for $chan<T> {
                const SHAPE: &'static Shape = &Shape {
                    id: TypeId::of::<Self>,
                    type_identifier: stringify!($chan),
                    type_name: core::any::type_name::<Self>,
                    layout: Layout::new::<Self>(),
                    def: Def::Unsupported(UnsupportedKind::Channel),
                    vtable: ValueVTable::EMPTY,
                };
            }
        )*
    };
}

channel_shape!(Sender, SyncSender, Receiver);
