use stencil_core::{Def, MapDef, Shape};

use super::record::wrapped;
use super::{Compiler, text_kind};
use crate::convert;
use crate::error::CompileError;
use crate::plan::{Access, KeyStep, PlanBuilder, Step};

impl Compiler {
    /// One step that writes `{`, every entry, and `}`, sorted by rendered
    /// key when the configuration asks for it.
    ///
    /// `escape` applies to the values only; keys are written as rendered.
    pub(super) fn mapping_step(
        &mut self,
        map: MapDef,
        at: Access,
        escape: bool,
    ) -> Result<Step, CompileError> {
        let sorted = self.config.sorts_map_keys();
        let (k, v) = (map.k(), map.v());

        if !escape {
            if let (Some(key), Some(value)) = (text_kind(k), text_kind(v)) {
                trace!(
                    "map `{} => {}`: text fast path, sorted {}",
                    k.type_name(),
                    v.type_name(),
                    sorted
                );
                return Ok(Step::TextMap {
                    at,
                    map: map.vtable,
                    key,
                    value,
                    sorted,
                });
            }
        }

        let key = key_step(k)?;
        let mut b = PlanBuilder::new();
        let value = if display_value(v, Access::Base, escape, &mut b) {
            trace!("map values of `{}` written through Display", v.type_name());
            b.finish()
        } else {
            self.fragment(v, escape)?
        };
        trace!(
            "map `{} => {}`: sorted {}",
            k.type_name(),
            v.type_name(),
            sorted
        );
        Ok(Step::Map {
            at,
            map: map.vtable,
            key,
            value,
            sorted,
        })
    }
}

/// Emits the quoted `Display` output of a map value, looking through options
/// and pointers. Types that write their own JSON keep doing so.
fn display_value(shape: &'static Shape, at: Access, escape: bool, b: &mut PlanBuilder) -> bool {
    match shape.vtable.display {
        Some(display) if shape.vtable.encode_json.is_none() => {
            b.push_static(b"\"");
            b.push_step(Step::Display {
                at,
                display,
                escape,
            });
            b.push_static(b"\"");
            true
        }
        _ => wrapped(shape, at, b, &|shape, at, b| {
            display_value(shape, at, escape, b)
        }),
    }
}

/// Resolves how keys of `shape` are rendered.
///
/// Types with a `Display` impl use it. Scalars use the conversion table.
/// Options and pointers are looked through; an absent key renders as the
/// empty string.
fn key_step(shape: &'static Shape) -> Result<KeyStep, CompileError> {
    if let Some(display) = shape.vtable.display {
        return Ok(KeyStep::Display(display));
    }
    match shape.def {
        Def::Scalar(ty) => Ok(KeyStep::Convert(convert::key(ty))),
        Def::Option(option) => Ok(KeyStep::Optional {
            get: option.get,
            inner: Box::new(key_step(option.t())?),
        }),
        Def::Pointer(pointer) => Ok(KeyStep::Deref {
            borrow: pointer.borrow,
            inner: Box::new(key_step(pointer.t())?),
        }),
        _ => Err(CompileError::unsupported_key(shape)),
    }
}
