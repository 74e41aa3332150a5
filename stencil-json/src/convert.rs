//! Primitive conversion table.
//!
//! Maps each [`ScalarType`] to a function that appends its JSON text to a
//! buffer. Numbers and booleans produce complete literals. Text kinds produce
//! the string content only: the surrounding quotes belong to the plan, where
//! they can be merged with neighbouring static text.

use stencil_core::{Buffer, EscapedString, PtrConst, ScalarType};

use crate::escape::write_escaped;

/// Appends the JSON rendering of the value behind the pointer.
pub(crate) type ConvertFn = unsafe fn(PtrConst, &mut Buffer);

/// Renderer for a number or boolean. `None` for text kinds.
pub(crate) fn literal(ty: ScalarType) -> Option<ConvertFn> {
    let convert: ConvertFn = match ty {
        ScalarType::Bool => bool_literal,
        ScalarType::I8 => integer::<i8>,
        ScalarType::I16 => integer::<i16>,
        ScalarType::I32 => integer::<i32>,
        ScalarType::I64 => integer::<i64>,
        ScalarType::I128 => integer::<i128>,
        ScalarType::ISize => integer::<isize>,
        ScalarType::U8 => integer::<u8>,
        ScalarType::U16 => integer::<u16>,
        ScalarType::U32 => integer::<u32>,
        ScalarType::U64 => integer::<u64>,
        ScalarType::U128 => integer::<u128>,
        ScalarType::USize => integer::<usize>,
        ScalarType::F32 => float::<f32>,
        ScalarType::F64 => float::<f64>,
        ScalarType::Char | ScalarType::String | ScalarType::Str | ScalarType::EscapedString => {
            return None;
        }
    };
    Some(convert)
}

/// Renderer for the content of a text kind, without quotes. `None` for
/// numbers and booleans.
///
/// `EscapedString` is always escaped; other kinds only when `escape` is set.
pub(crate) fn text(ty: ScalarType, escape: bool) -> Option<ConvertFn> {
    let convert: ConvertFn = match (ty, escape) {
        (ScalarType::String, false) => string,
        (ScalarType::String, true) => string_escaped,
        (ScalarType::Str, false) => str_ref,
        (ScalarType::Str, true) => str_ref_escaped,
        (ScalarType::Char, false) => char_text,
        (ScalarType::Char, true) => char_escaped,
        (ScalarType::EscapedString, _) => escaped_string,
        _ => return None,
    };
    Some(convert)
}

/// Renderer for a scalar used as a map key: the same text as a value, but
/// never quoted.
pub(crate) fn key(ty: ScalarType) -> ConvertFn {
    literal(ty).or_else(|| text(ty, false)).unwrap_or(null)
}

/// Renderer for the `raw` option on text: the content unquoted and
/// unescaped, or `null` when empty.
pub(crate) fn raw_text(ty: ScalarType) -> Option<ConvertFn> {
    match ty {
        ScalarType::String => Some(raw_string),
        ScalarType::Str => Some(raw_str),
        ScalarType::EscapedString => Some(raw_escaped_string),
        _ => None,
    }
}

unsafe fn null(_ptr: PtrConst, out: &mut Buffer) {
    out.extend(b"null");
}

unsafe fn bool_literal(ptr: PtrConst, out: &mut Buffer) {
    if unsafe { *ptr.get::<bool>() } {
        out.extend(b"true");
    } else {
        out.extend(b"false");
    }
}

unsafe fn integer<T: itoa::Integer + Copy>(ptr: PtrConst, out: &mut Buffer) {
    let mut buf = itoa::Buffer::new();
    out.push_str(buf.format(unsafe { *ptr.get::<T>() }));
}

/// Finite floats in their shortest round-trippable form, everything else as
/// `null`.
unsafe fn float<T: ryu::Float + Finite + Copy>(ptr: PtrConst, out: &mut Buffer) {
    let value = unsafe { *ptr.get::<T>() };
    if value.finite() {
        let mut buf = ryu::Buffer::new();
        out.push_str(buf.format_finite(value));
    } else {
        out.extend(b"null");
    }
}

trait Finite {
    fn finite(self) -> bool;
}

impl Finite for f32 {
    fn finite(self) -> bool {
        self.is_finite()
    }
}

impl Finite for f64 {
    fn finite(self) -> bool {
        self.is_finite()
    }
}

unsafe fn string(ptr: PtrConst, out: &mut Buffer) {
    out.push_str(unsafe { ptr.get::<String>() });
}

unsafe fn string_escaped(ptr: PtrConst, out: &mut Buffer) {
    write_escaped(out.as_mut_vec(), unsafe { ptr.get::<String>() });
}

unsafe fn str_ref(ptr: PtrConst, out: &mut Buffer) {
    out.push_str(unsafe { ptr.get::<&str>() });
}

unsafe fn str_ref_escaped(ptr: PtrConst, out: &mut Buffer) {
    write_escaped(out.as_mut_vec(), unsafe { ptr.get::<&str>() });
}

unsafe fn char_text(ptr: PtrConst, out: &mut Buffer) {
    let mut buf = [0u8; 4];
    out.push_str(unsafe { ptr.get::<char>() }.encode_utf8(&mut buf));
}

unsafe fn char_escaped(ptr: PtrConst, out: &mut Buffer) {
    let mut buf = [0u8; 4];
    let c = unsafe { ptr.get::<char>() }.encode_utf8(&mut buf);
    write_escaped(out.as_mut_vec(), c);
}

unsafe fn escaped_string(ptr: PtrConst, out: &mut Buffer) {
    write_escaped(out.as_mut_vec(), unsafe { ptr.get::<EscapedString>() });
}

fn raw(content: &[u8], out: &mut Buffer) {
    if content.is_empty() {
        out.extend(b"null");
    } else {
        out.extend(content);
    }
}

unsafe fn raw_string(ptr: PtrConst, out: &mut Buffer) {
    raw(unsafe { ptr.get::<String>() }.as_bytes(), out);
}

unsafe fn raw_str(ptr: PtrConst, out: &mut Buffer) {
    raw(unsafe { ptr.get::<&str>() }.as_bytes(), out);
}

unsafe fn raw_escaped_string(ptr: PtrConst, out: &mut Buffer) {
    raw(unsafe { ptr.get::<EscapedString>() }.as_bytes(), out);
}

/// `raw` on `Vec<u8>`.
pub(crate) unsafe fn raw_byte_vec(ptr: PtrConst, out: &mut Buffer) {
    raw(unsafe { ptr.get::<Vec<u8>>() }, out);
}

/// `raw` on `&'static [u8]`.
pub(crate) unsafe fn raw_byte_slice(ptr: PtrConst, out: &mut Buffer) {
    raw(unsafe { ptr.get::<&[u8]>() }, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_testhelpers::test;

    fn render<T>(value: &T, convert: ConvertFn) -> String {
        let mut out = Buffer::new();
        unsafe { convert(PtrConst::new(value), &mut out) };
        out.into_string().unwrap()
    }

    #[test]
    fn integers_use_decimal_text() {
        let i32_lit = literal(ScalarType::I32).unwrap();
        assert_eq!(render(&-784i32, i32_lit), "-784");
        assert_eq!(render(&u64::MAX, literal(ScalarType::U64).unwrap()), "18446744073709551615");
        assert_eq!(render(&i128::MIN, literal(ScalarType::I128).unwrap()), "-170141183460469231731687303715884105728");
    }

    #[test]
    fn booleans_are_single_literals() {
        let convert = literal(ScalarType::Bool).unwrap();
        assert_eq!(render(&true, convert), "true");
        assert_eq!(render(&false, convert), "false");
    }

    #[test]
    fn floats_are_shortest_and_finite() {
        let f64_lit = literal(ScalarType::F64).unwrap();
        assert_eq!(render(&1.5f64, f64_lit), "1.5");
        // Integral floats keep a fractional part and small magnitudes use an
        // exponent: `1.0` and `1e-7`, not `1` and `0.0000001`.
        assert_eq!(render(&1.0f64, f64_lit), "1.0");
        assert_eq!(render(&1e-7f64, f64_lit), "1e-7");
        assert_eq!(render(&0.1f32, literal(ScalarType::F32).unwrap()), "0.1");
        assert_eq!(render(&f64::NAN, f64_lit), "null");
        assert_eq!(render(&f64::NEG_INFINITY, f64_lit), "null");
    }

    #[test]
    fn text_kinds_have_no_literal() {
        assert!(literal(ScalarType::String).is_none());
        assert!(text(ScalarType::U8, false).is_none());
        assert!(raw_text(ScalarType::Char).is_none());
    }

    #[test]
    fn text_is_unquoted_content() {
        let s = String::from("a\"b");
        assert_eq!(render(&s, text(ScalarType::String, false).unwrap()), "a\"b");
        assert_eq!(render(&s, text(ScalarType::String, true).unwrap()), "a\\\"b");
        let e = EscapedString::from("tab\t");
        assert_eq!(render(&e, text(ScalarType::EscapedString, false).unwrap()), "tab\\t");
        assert_eq!(render(&'é', text(ScalarType::Char, false).unwrap()), "é");
    }

    #[test]
    fn keys_are_never_quoted() {
        assert_eq!(render(&-5i8, key(ScalarType::I8)), "-5");
        assert_eq!(render(&"k", key(ScalarType::Str)), "k");
    }

    #[test]
    fn raw_empty_is_null() {
        let convert = raw_text(ScalarType::String).unwrap();
        assert_eq!(render(&String::new(), convert), "null");
        assert_eq!(render(&String::from("{\"a\":1}"), convert), "{\"a\":1}");
        assert_eq!(render(&Vec::<u8>::new(), raw_byte_vec), "null");
        assert_eq!(render(&b"[1]".to_vec(), raw_byte_vec), "[1]");
    }
}
