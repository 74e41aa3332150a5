//! Shape to plan compilation.
//!
//! A [`Compiler`] walks a shape once and emits steps into a [`PlanBuilder`].
//! Record types get their own plan in the arena, memoized by `TypeId`, so a
//! record reached twice is compiled once and recursive records terminate.
//! Everything else is compiled inline, either into the caller's builder or
//! into a fragment owned by the step that needs it.

use core::any::TypeId;
use std::collections::HashMap;

use stencil_core::{Def, ScalarType, Shape, StructDef};

use crate::config::Config;
use crate::convert;
use crate::error::CompileError;
use crate::plan::{Access, Plan, PlanBuilder, PlanId, Program, Step, TextKind};

mod mapping;
mod record;
mod sequence;

pub(crate) struct Compiler {
    config: Config,
    plans: Vec<Plan>,
    memo: HashMap<TypeId, PlanId>,
}

impl Compiler {
    pub(crate) fn new(config: Config) -> Self {
        Self {
            config,
            plans: Vec::new(),
            memo: HashMap::new(),
        }
    }

    /// Compiles `shape` as the root of an encoder.
    pub(crate) fn compile(mut self, shape: &'static Shape) -> Result<Program, CompileError> {
        let root = self.fragment(shape, false)?;
        Ok(Program {
            plans: self.plans.into_boxed_slice(),
            root,
        })
    }

    /// Steps that encode a value of `shape` at the address they run against.
    pub(crate) fn fragment(
        &mut self,
        shape: &'static Shape,
        escape: bool,
    ) -> Result<Box<[Step]>, CompileError> {
        let mut b = PlanBuilder::new();
        self.compile_value(shape, Access::Base, escape, &mut b)?;
        Ok(b.finish())
    }

    /// Emits the steps that encode the value of `shape` found at `at`.
    ///
    /// `escape` requests JSON escaping for every text leaf reached from here.
    pub(crate) fn compile_value(
        &mut self,
        shape: &'static Shape,
        at: Access,
        escape: bool,
        b: &mut PlanBuilder,
    ) -> Result<(), CompileError> {
        match shape.def {
            Def::Scalar(ty) => {
                if let Some(convert) = convert::literal(ty) {
                    b.push_step(Step::Scalar { at, convert });
                } else if let Some(convert) = convert::text(ty, escape) {
                    b.push_static(b"\"");
                    b.push_step(Step::Scalar { at, convert });
                    b.push_static(b"\"");
                } else {
                    return Err(CompileError::unsupported(shape));
                }
            }
            Def::Struct(def) => {
                let plan = self.record_plan(shape, def)?;
                b.push_step(Step::Record { at, plan });
            }
            Def::List(list) => {
                let step = self.sequence_step(list, at, escape)?;
                b.push_step(step);
            }
            Def::Array(array) => self.array_steps(array, at, escape, b)?,
            Def::Map(map) => {
                let step = self.mapping_step(map, at, escape)?;
                b.push_step(step);
            }
            Def::Option(option) => {
                let inner = self.fragment(option.t(), escape)?;
                b.push_step(Step::Nullable {
                    at,
                    get: option.get,
                    inner,
                });
            }
            Def::Pointer(pointer) => {
                let inner = self.fragment(pointer.t(), escape)?;
                b.push_step(Step::Deref {
                    at,
                    borrow: pointer.borrow,
                    inner,
                });
            }
            Def::Opaque => {
                if let Some(encode) = shape.vtable.encode_json {
                    b.push_step(Step::Encode { at, encode });
                } else if let Some(display) = shape.vtable.display {
                    b.push_static(b"\"");
                    b.push_step(Step::Display {
                        at,
                        display,
                        escape,
                    });
                    b.push_static(b"\"");
                } else {
                    return Err(CompileError::unsupported(shape));
                }
            }
            Def::Unsupported(_) => return Err(CompileError::unsupported(shape)),
        }
        Ok(())
    }

    /// Returns the plan for a record type, compiling it on first use.
    fn record_plan(
        &mut self,
        shape: &'static Shape,
        def: StructDef,
    ) -> Result<PlanId, CompileError> {
        if let Some(&id) = self.memo.get(&shape.id()) {
            trace!("reusing plan {} for `{}`", id.0, shape.type_name());
            return Ok(id);
        }

        // Registered before the fields are compiled so that a field of the
        // record's own type refers back to this plan.
        let id = PlanId(self.plans.len());
        self.plans.push(Plan::default());
        self.memo.insert(shape.id(), id);

        trace!("compiling record `{}` as plan {}", shape.type_name(), id.0);
        let steps = self.record_steps(def)?;
        self.plans[id.0].steps = steps;
        Ok(id)
    }
}

/// Plain text kinds eligible for the unescaped fast paths.
pub(crate) fn text_kind(shape: &Shape) -> Option<TextKind> {
    match shape.def {
        Def::Scalar(ScalarType::String) => Some(TextKind::String),
        Def::Scalar(ScalarType::Str) => Some(TextKind::Str),
        _ => None,
    }
}
