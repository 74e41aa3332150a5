use stencil_core::{Def, Field, Shape, StructDef};

use super::Compiler;
use crate::convert;
use crate::error::CompileError;
use crate::plan::{Access, PlanBuilder, Step};
use crate::tag::{FieldOption, FieldTag};

impl Compiler {
    /// Steps for one record: `{`, then `"key":value` per tagged field in
    /// declaration order, then `}`.
    pub(super) fn record_steps(&mut self, def: StructDef) -> Result<Box<[Step]>, CompileError> {
        let mut b = PlanBuilder::new();
        b.push_static(b"{");
        let mut first = true;
        for field in def.fields {
            let Some(tag) = FieldTag::parse(field.tag) else {
                trace!("  {}: skipped", field.name);
                continue;
            };
            if !first {
                b.push_static(b",");
            }
            first = false;

            b.push_static(b"\"");
            b.push_static(tag.key.as_bytes());
            b.push_static(b"\":");
            self.compile_field(field, tag.option, &mut b)
                .map_err(|err| err.in_field(field.name))?;
        }
        b.push_static(b"}");
        Ok(b.finish())
    }

    fn compile_field(
        &mut self,
        field: &Field,
        option: Option<FieldOption>,
        b: &mut PlanBuilder,
    ) -> Result<(), CompileError> {
        let shape = field.shape();
        let at = Access::Field(field.get);
        trace!(
            "  {}: {} ({}), option {:?}",
            field.name,
            shape.type_name(),
            shape.kind(),
            option.map(FieldOption::name)
        );

        match option {
            Some(FieldOption::Stringer) => {
                if !stringer(shape, at, b) {
                    trace!("  {}: no Display, stringer ignored", field.name);
                    self.compile_value(shape, at, false, b)?;
                }
            }
            Some(FieldOption::Encoder) => {
                if !encoder(shape, at, b) {
                    trace!("  {}: no EncodeJson, written as null", field.name);
                    b.push_static(b"null");
                }
            }
            Some(FieldOption::Raw) => {
                if !raw(shape, at, b) {
                    return Err(CompileError::unsupported_option(
                        FieldOption::Raw.name(),
                        shape,
                    ));
                }
            }
            Some(FieldOption::Escape) => self.compile_value(shape, at, true, b)?,
            None => self.compile_value(shape, at, false, b)?,
        }
        Ok(())
    }
}

/// Emits the quoted `Display` output of the value, looking through options
/// and pointers. Returns false, emitting nothing, when there is no `Display`
/// at the end.
fn stringer(shape: &'static Shape, at: Access, b: &mut PlanBuilder) -> bool {
    if let Some(display) = shape.vtable.display {
        b.push_static(b"\"");
        b.push_step(Step::Display {
            at,
            display,
            escape: false,
        });
        b.push_static(b"\"");
        return true;
    }
    wrapped(shape, at, b, &stringer)
}

/// Emits a call to the value's `EncodeJson` impl, looking through options
/// and pointers.
fn encoder(shape: &'static Shape, at: Access, b: &mut PlanBuilder) -> bool {
    if let Some(encode) = shape.vtable.encode_json {
        b.push_step(Step::Encode { at, encode });
        return true;
    }
    wrapped(shape, at, b, &encoder)
}

/// Emits verbatim text or bytes, looking through options and pointers.
fn raw(shape: &'static Shape, at: Access, b: &mut PlanBuilder) -> bool {
    let convert = match shape.def {
        Def::Scalar(ty) => convert::raw_text(ty),
        _ if shape.is_type::<Vec<u8>>() => Some(convert::raw_byte_vec as convert::ConvertFn),
        _ if shape.is_type::<&'static [u8]>() => Some(convert::raw_byte_slice as convert::ConvertFn),
        _ => None,
    };
    match convert {
        Some(convert) => {
            b.push_step(Step::Scalar { at, convert });
            true
        }
        None => wrapped(shape, at, b, &raw),
    }
}

/// Applies `leaf` to the pointee of an `Option` or smart pointer. An absent
/// option is written as `null`.
pub(super) fn wrapped(
    shape: &'static Shape,
    at: Access,
    b: &mut PlanBuilder,
    leaf: &dyn Fn(&'static Shape, Access, &mut PlanBuilder) -> bool,
) -> bool {
    let mut inner = PlanBuilder::new();
    match shape.def {
        Def::Option(option) => {
            if !leaf(option.t(), Access::Base, &mut inner) {
                return false;
            }
            b.push_step(Step::Nullable {
                at,
                get: option.get,
                inner: inner.finish(),
            });
            true
        }
        Def::Pointer(pointer) => {
            if !leaf(pointer.t(), Access::Base, &mut inner) {
                return false;
            }
            b.push_step(Step::Deref {
                at,
                borrow: pointer.borrow,
                inner: inner.finish(),
            });
            true
        }
        _ => false,
    }
}
