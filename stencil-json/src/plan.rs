//! Compiled plans and their execution.
//!
//! A plan is a flat list of [`Step`]s. Record plans live in an arena owned by
//! the [`Program`] and refer to each other by [`PlanId`], so recursive types
//! compile to a finite graph. Steps for values that sit behind an option, a
//! pointer, a list element or a map value are stored inline as fragments
//! that run against the address of that value.

use core::fmt::{self, Write as _};
use core::mem;

use stencil_core::{
    Buffer, BorrowFn, DisplayFn, EncodeJsonFn, FieldGetFn, IndexFn, KeySpan, ListVTable,
    MapVTable, OptionGetFn, PtrConst,
};

use crate::convert::ConvertFn;
use crate::escape::EscapingWriter;

/// Index of a record plan in a [`Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PlanId(pub(crate) usize);

/// The steps that encode one record type.
#[derive(Default)]
pub(crate) struct Plan {
    pub(crate) steps: Box<[Step]>,
}

/// Where a step finds its value, relative to the address it runs against.
///
/// Resolved once at compile time; executing a step only calls the accessors.
#[derive(Clone, Copy)]
pub(crate) enum Access {
    /// The address itself.
    Base,
    /// A record field.
    Field(FieldGetFn),
    /// An element of a fixed-size array, itself either the base value or a
    /// record field.
    Element {
        field: Option<FieldGetFn>,
        get: IndexFn,
        index: usize,
    },
}

impl Access {
    #[inline(always)]
    unsafe fn resolve(self, base: PtrConst) -> PtrConst {
        unsafe {
            match self {
                Access::Base => base,
                Access::Field(get) => get(base),
                Access::Element { field, get, index } => {
                    let array = match field {
                        Some(field) => field(base),
                        None => base,
                    };
                    get(array, index)
                }
            }
        }
    }
}

/// Plain text kinds read directly by the fast paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextKind {
    String,
    Str,
}

impl TextKind {
    #[inline(always)]
    unsafe fn read<'a>(self, ptr: PtrConst) -> &'a str {
        unsafe {
            match self {
                TextKind::String => ptr.get::<String>().as_str(),
                TextKind::Str => *ptr.get::<&'static str>(),
            }
        }
    }
}

/// How a map key is turned into the text between its quotes.
pub(crate) enum KeyStep {
    /// A scalar from the conversion table.
    Convert(ConvertFn),
    /// `Display` output.
    Display(DisplayFn),
    /// `Option<K>`: absent keys render as the empty string.
    Optional { get: OptionGetFn, inner: Box<KeyStep> },
    /// `Box<K>` and friends.
    Deref { borrow: BorrowFn, inner: Box<KeyStep> },
}

/// One unit of execution.
pub(crate) enum Step {
    /// Literal JSON text.
    Static(Box<[u8]>),

    /// A scalar from the conversion table.
    Scalar { at: Access, convert: ConvertFn },

    /// A nested record.
    Record { at: Access, plan: PlanId },

    /// `Option<T>`: `null` when absent, `inner` against the pointee otherwise.
    Nullable {
        at: Access,
        get: OptionGetFn,
        inner: Box<[Step]>,
    },

    /// `Box<T>`, `Rc<T>`, `Arc<T>`: `inner` against the pointee.
    Deref {
        at: Access,
        borrow: BorrowFn,
        inner: Box<[Step]>,
    },

    /// A list, with `item` run against every element.
    Sequence {
        at: Access,
        list: ListVTable,
        item: Box<[Step]>,
    },

    /// A list of plain strings.
    TextSequence {
        at: Access,
        list: ListVTable,
        text: TextKind,
    },

    /// A fixed-size array that was not unrolled.
    Array {
        at: Access,
        n: usize,
        get: IndexFn,
        item: Box<[Step]>,
    },

    /// A map.
    Map {
        at: Access,
        map: MapVTable,
        key: KeyStep,
        value: Box<[Step]>,
        sorted: bool,
    },

    /// A map from plain strings to plain strings.
    TextMap {
        at: Access,
        map: MapVTable,
        key: TextKind,
        value: TextKind,
        sorted: bool,
    },

    /// `Display` output, without quotes.
    Display {
        at: Access,
        display: DisplayFn,
        escape: bool,
    },

    /// Delegation to `EncodeJson`.
    Encode { at: Access, encode: EncodeJsonFn },
}

/// Accumulates steps, merging consecutive static text into one step.
#[derive(Default)]
pub(crate) struct PlanBuilder {
    steps: Vec<Step>,
    pending: Vec<u8>,
}

impl PlanBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues literal text.
    #[inline]
    pub(crate) fn push_static(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// Appends a value-producing step after any queued text.
    pub(crate) fn push_step(&mut self, step: Step) {
        self.flush();
        self.steps.push(step);
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let bytes = mem::take(&mut self.pending).into_boxed_slice();
            self.steps.push(Step::Static(bytes));
        }
    }

    pub(crate) fn finish(mut self) -> Box<[Step]> {
        self.flush();
        self.steps.into_boxed_slice()
    }
}

/// Record plans plus the root steps of one encoder.
pub(crate) struct Program {
    pub(crate) plans: Box<[Plan]>,
    pub(crate) root: Box<[Step]>,
}

/// Adapts a [`DisplayFn`] to `core::fmt::Display`.
struct Shown(PtrConst, DisplayFn);

impl fmt::Display for Shown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        unsafe { (self.1)(self.0, f) }
    }
}

impl Program {
    /// Runs the root steps against `value`.
    ///
    /// # Safety
    ///
    /// `value` must point to a live value of the type the program was
    /// compiled for.
    #[inline]
    pub(crate) unsafe fn execute(&self, value: PtrConst, out: &mut Buffer) {
        unsafe { self.run(&self.root, value, out) }
    }

    #[inline]
    unsafe fn run(&self, steps: &[Step], base: PtrConst, out: &mut Buffer) {
        for step in steps {
            unsafe { self.step(step, base, out) }
        }
    }

    unsafe fn step(&self, step: &Step, base: PtrConst, out: &mut Buffer) {
        unsafe {
            match step {
                Step::Static(bytes) => out.extend(bytes),
                Step::Scalar { at, convert } => (*convert)(at.resolve(base), out),
                Step::Record { at, plan } => {
                    self.run(&self.plans[plan.0].steps, at.resolve(base), out)
                }
                Step::Nullable { at, get, inner } => match (*get)(at.resolve(base)) {
                    Some(ptr) => self.run(inner, ptr, out),
                    None => out.extend(b"null"),
                },
                Step::Deref { at, borrow, inner } => {
                    self.run(inner, (*borrow)(at.resolve(base)), out)
                }
                Step::Sequence { at, list, item } => {
                    let ptr = at.resolve(base);
                    out.push(b'[');
                    for i in 0..(list.len)(ptr) {
                        if i > 0 {
                            out.push(b',');
                        }
                        self.run(item, (list.get)(ptr, i), out);
                    }
                    out.push(b']');
                }
                Step::TextSequence { at, list, text } => {
                    let ptr = at.resolve(base);
                    out.push(b'[');
                    for i in 0..(list.len)(ptr) {
                        if i > 0 {
                            out.push(b',');
                        }
                        out.push(b'"');
                        out.push_str(text.read((list.get)(ptr, i)));
                        out.push(b'"');
                    }
                    out.push(b']');
                }
                Step::Array { at, n, get, item } => {
                    let ptr = at.resolve(base);
                    out.push(b'[');
                    for i in 0..*n {
                        if i > 0 {
                            out.push(b',');
                        }
                        self.run(item, (*get)(ptr, i), out);
                    }
                    out.push(b']');
                }
                Step::Map {
                    at,
                    map,
                    key,
                    value,
                    sorted,
                } => {
                    let render_key = |k: PtrConst, out: &mut Buffer| write_key(key, k, out);
                    let render_value = |v: PtrConst, out: &mut Buffer| self.run(value, v, out);
                    if *sorted {
                        sorted_entries(map, at.resolve(base), out, render_key, render_value);
                    } else {
                        entries(map, at.resolve(base), out, render_key, render_value);
                    }
                }
                Step::TextMap {
                    at,
                    map,
                    key,
                    value,
                    sorted,
                } => {
                    let render_key = |k: PtrConst, out: &mut Buffer| out.push_str(key.read(k));
                    let render_value = |v: PtrConst, out: &mut Buffer| {
                        out.push(b'"');
                        out.push_str(value.read(v));
                        out.push(b'"');
                    };
                    if *sorted {
                        sorted_entries(map, at.resolve(base), out, render_key, render_value);
                    } else {
                        entries(map, at.resolve(base), out, render_key, render_value);
                    }
                }
                Step::Display {
                    at,
                    display,
                    escape,
                } => write_display(at.resolve(base), *display, *escape, out),
                Step::Encode { at, encode } => (*encode)(at.resolve(base), out),
            }
        }
    }
}

/// Writes `Display` output. A failing `Display` impl leaves whatever it
/// wrote so far.
#[inline]
unsafe fn write_display(ptr: PtrConst, display: DisplayFn, escape: bool, out: &mut Buffer) {
    let shown = Shown(ptr, display);
    let _ = if escape {
        write!(EscapingWriter(out.as_mut_vec()), "{shown}")
    } else {
        write!(out, "{shown}")
    };
}

unsafe fn write_key(key: &KeyStep, ptr: PtrConst, out: &mut Buffer) {
    unsafe {
        match key {
            KeyStep::Convert(convert) => (*convert)(ptr, out),
            KeyStep::Display(display) => write_display(ptr, *display, false, out),
            KeyStep::Optional { get, inner } => {
                if let Some(ptr) = (*get)(ptr) {
                    write_key(inner, ptr, out);
                }
            }
            KeyStep::Deref { borrow, inner } => write_key(inner, (*borrow)(ptr), out),
        }
    }
}

/// Writes `{"k":v,...}` in the map's iteration order.
#[inline]
unsafe fn entries(
    map: &MapVTable,
    ptr: PtrConst,
    out: &mut Buffer,
    render_key: impl Fn(PtrConst, &mut Buffer),
    render_value: impl Fn(PtrConst, &mut Buffer),
) {
    out.push(b'{');
    let mut first = true;
    unsafe {
        (map.for_each)(ptr, &mut |k: PtrConst, v: PtrConst| {
            if !first {
                out.push(b',');
            }
            first = false;
            out.push(b'"');
            render_key(k, out);
            out.extend(b"\":");
            render_value(v, out);
        });
    }
    out.push(b'}');
}

/// Writes `{"k":v,...}` sorted by the bytes of the rendered keys.
///
/// Keys are first rendered at the end of the buffer, with their spans and
/// value pointers recorded in the buffer's key span stack. The spans are
/// sorted, the object is written after the rendered keys by copying each key
/// and rendering its value, and finally the rendered keys are cut out.
#[inline]
unsafe fn sorted_entries(
    map: &MapVTable,
    ptr: PtrConst,
    out: &mut Buffer,
    render_key: impl Fn(PtrConst, &mut Buffer),
    render_value: impl Fn(PtrConst, &mut Buffer),
) {
    let mark = out.key_spans().len();
    let keys_start = out.len();
    unsafe {
        (map.for_each)(ptr, &mut |k: PtrConst, v: PtrConst| {
            let start = out.len();
            render_key(k, out);
            let end = out.len();
            out.key_spans().push(KeySpan {
                start,
                end,
                value: v,
            });
        });
    }
    let keys_end = out.len();
    let entry_count = out.key_spans().len() - mark;
    out.sort_key_spans(mark);

    out.push(b'{');
    for i in 0..entry_count {
        // Nested sorted maps push above `mark + entry_count` and pop back.
        let span = out.key_spans()[mark + i];
        if i > 0 {
            out.push(b',');
        }
        out.push(b'"');
        out.extend_from_within(span.start..span.end);
        out.extend(b"\":");
        render_value(span.value, out);
    }
    out.push(b'}');

    out.key_spans().truncate(mark);
    out.splice_out(keys_start..keys_end);
}
