//! JSON string escaping.

use core::fmt;

const WINDOW: usize = 16;
const LOW_BITS: u128 = u128::from_ne_bytes([0x01; WINDOW]);
const HIGH_BITS: u128 = u128::from_ne_bytes([0x80; WINDOW]);

/// Appends the escaped content of `s`, without surrounding quotes.
///
/// `"`, `\` and bytes below 0x20 are escaped; everything else, including
/// non-ASCII text, is copied as is.
pub(crate) fn write_escaped(out: &mut Vec<u8>, s: &str) {
    let mut rest = s;
    while let Some(window) = rest.as_bytes().first_chunk::<WINDOW>() {
        if is_plain(u128::from_ne_bytes(*window)) {
            out.extend_from_slice(window);
            rest = &rest[WINDOW..];
            continue;
        }

        // Slow path for at least one window's worth of bytes.
        let mut chars = rest.chars();
        let mut budget = WINDOW;
        while budget > 0 {
            let Some(c) = chars.next() else { break };
            write_escaped_char(out, c);
            budget = budget.saturating_sub(c.len_utf8());
        }
        rest = chars.as_str();
    }

    for c in rest.chars() {
        write_escaped_char(out, c);
    }
}

#[inline]
fn write_escaped_char(out: &mut Vec<u8>, c: char) {
    match c {
        '"' => out.extend_from_slice(b"\\\""),
        '\\' => out.extend_from_slice(b"\\\\"),
        '\n' => out.extend_from_slice(b"\\n"),
        '\r' => out.extend_from_slice(b"\\r"),
        '\t' => out.extend_from_slice(b"\\t"),
        '\u{08}' => out.extend_from_slice(b"\\b"),
        '\u{0C}' => out.extend_from_slice(b"\\f"),
        c if (c as u32) < 0x20 => {
            const HEX: &[u8; 16] = b"0123456789abcdef";
            let code = c as usize;
            out.extend_from_slice(&[b'\\', b'u', b'0', b'0', HEX[code >> 4], HEX[code & 0xF]]);
        }
        c if c.is_ascii() => out.push(c as u8),
        c => {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }
}

/// True when every byte packed in `window` can be copied unescaped.
#[inline]
const fn is_plain(window: u128) -> bool {
    window & HIGH_BITS == 0
        && !has_zero_byte(window ^ (LOW_BITS * b'"' as u128))
        && !has_zero_byte(window ^ (LOW_BITS * b'\\' as u128))
        // Control characters are exactly the bytes whose top three bits are clear.
        && !has_zero_byte(window & (LOW_BITS * 0xe0))
}

/// Whether any byte lane of `x` is zero.
#[inline]
const fn has_zero_byte(x: u128) -> bool {
    x.wrapping_sub(LOW_BITS) & !x & HIGH_BITS != 0
}

/// `fmt::Write` sink that escapes everything written to it.
pub(crate) struct EscapingWriter<'a>(pub(crate) &'a mut Vec<u8>);

impl fmt::Write for EscapingWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        write_escaped(self.0, s);
        Ok(())
    }
}
