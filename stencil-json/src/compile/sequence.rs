use stencil_core::{ArrayDef, Def, ListDef};

use super::{Compiler, text_kind};
use crate::error::CompileError;
use crate::plan::{Access, PlanBuilder, Step};

/// Longest scalar array that is written with one step per element.
const UNROLL_LIMIT: usize = 32;

impl Compiler {
    /// One step that writes `[`, every element, and `]`.
    ///
    /// Lists of plain strings skip the per-element step dispatch, unless
    /// they have to be escaped.
    pub(super) fn sequence_step(
        &mut self,
        list: ListDef,
        at: Access,
        escape: bool,
    ) -> Result<Step, CompileError> {
        let item = list.t();
        if !escape {
            if let Some(text) = text_kind(item) {
                trace!("sequence of `{}`: text fast path", item.type_name());
                return Ok(Step::TextSequence {
                    at,
                    list: list.vtable,
                    text,
                });
            }
        }

        let item = self.fragment(item, escape)?;
        Ok(Step::Sequence {
            at,
            list: list.vtable,
            item,
        })
    }

    /// Steps for a fixed-size array.
    ///
    /// Short arrays of scalars that sit directly in the value or in a record
    /// field are unrolled: the brackets and commas become static text and
    /// each element gets its own step. Anything else loops at execution time.
    pub(super) fn array_steps(
        &mut self,
        array: ArrayDef,
        at: Access,
        escape: bool,
        b: &mut PlanBuilder,
    ) -> Result<(), CompileError> {
        let item = array.t();
        let field = match at {
            Access::Base => Some(None),
            Access::Field(get) => Some(Some(get)),
            Access::Element { .. } => None,
        };

        match (item.def, field) {
            (Def::Scalar(_), Some(field)) if array.n <= UNROLL_LIMIT => {
                trace!("unrolling [{}; {}]", item.type_name(), array.n);
                b.push_static(b"[");
                for index in 0..array.n {
                    if index > 0 {
                        b.push_static(b",");
                    }
                    let element = Access::Element {
                        field,
                        get: array.get,
                        index,
                    };
                    self.compile_value(item, element, escape, b)?;
                }
                b.push_static(b"]");
            }
            _ => {
                let item = self.fragment(item, escape)?;
                b.push_step(Step::Array {
                    at,
                    n: array.n,
                    get: array.get,
                    item,
                });
            }
        }
        Ok(())
    }
}
