use core::{alloc::Layout, any::TypeId};

use indexmap::IndexMap;

use crate::{Def, MapDef, MapVTable, PtrConst, Shape, Shaped, ValueVTable, shape_of};

unsafe fn indexmap_for_each<K, V, S>(ptr: PtrConst, f: &mut dyn FnMut(PtrConst, PtrConst)) {
    for (k, v) in unsafe { ptr.get::<IndexMap<K, V, S>>() } {
        f(PtrConst::new(k), PtrConst::new(v));
    }
}

// Native iteration is insertion order, so unsorted encoding preserves it.
unsafe impl<K: Shaped, V: Shaped, S: 'static> Shaped for IndexMap<K, V, S> {
    const SHAPE: &'static Shape = &Shape {
        id: TypeId::of::<Self>,
        type_identifier: "IndexMap",
        type_name: core::any::type_name::<Self>,
        layout: Layout::new::<Self>(),
        def: Def::Map(MapDef {
            vtable: MapVTable {
                for_each: indexmap_for_each::<K, V, S>,
            },
            k: shape_of::<K>,
            v: shape_of::<V>,
        }),
        vtable: ValueVTable::EMPTY,
    };
}
