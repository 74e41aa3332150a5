use core::{fmt, ops::Range, str::Utf8Error};
use std::{io, string::FromUtf8Error};

use crate::PtrConst;

/// A growable byte sink that encoders append JSON to.
///
/// Besides the output bytes, a buffer owns the scratch space that sorted map
/// encoding uses to remember rendered keys. Both are cleared by [`reset`]
/// and keep their capacity, so a pooled buffer stops allocating once it has
/// grown to the size of the values it encodes.
///
/// [`reset`]: Buffer::reset
#[derive(Default, Clone)]
pub struct Buffer {
    bytes: Vec<u8>,
    spans: Vec<KeySpan>,
}

/// A key rendered into a [`Buffer`] by a sorted map encoder.
///
/// `start..end` is the byte range of the key text; `value` points at the
/// map value the key belongs to.
#[derive(Debug, Clone, Copy)]
pub struct KeySpan {
    /// Offset of the first byte of the key.
    pub start: usize,
    /// Offset one past the last byte of the key.
    pub end: usize,
    /// The entry's value.
    pub value: PtrConst,
}

impl Buffer {
    /// Creates an empty buffer without allocating.
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            spans: Vec::new(),
        }
    }

    /// Creates an empty buffer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            spans: Vec::new(),
        }
    }

    /// Appends one byte.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Appends a byte slice.
    #[inline]
    pub fn extend(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Appends a string.
    #[inline]
    pub fn push_str(&mut self, s: &str) {
        self.bytes.extend_from_slice(s.as_bytes());
    }

    /// Appends a copy of the bytes in `range`, which must lie within the buffer.
    #[inline]
    pub fn extend_from_within(&mut self, range: Range<usize>) {
        self.bytes.extend_from_within(range);
    }

    /// Removes the bytes in `range`, shifting everything after it down.
    pub fn splice_out(&mut self, range: Range<usize>) {
        self.bytes.drain(range);
    }

    /// Shortens the buffer to `len` bytes.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
    }

    /// Clears contents and scratch space, keeping capacity.
    #[inline]
    pub fn reset(&mut self) {
        self.bytes.clear();
        self.spans.clear();
    }

    /// Number of bytes written.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of bytes the buffer can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// Reserves room for at least `additional` more bytes.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.bytes.reserve(additional);
    }

    /// The bytes written so far.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The bytes written so far, as text.
    ///
    /// Fails only if a `raw` field wrote bytes that are not UTF-8.
    #[inline]
    pub fn as_str(&self) -> Result<&str, Utf8Error> {
        core::str::from_utf8(&self.bytes)
    }

    /// Direct access to the underlying bytes.
    #[inline]
    pub fn as_mut_vec(&mut self) -> &mut Vec<u8> {
        &mut self.bytes
    }

    /// Consumes the buffer, returning its bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    /// Consumes the buffer, returning its contents as a `String`.
    pub fn into_string(self) -> Result<String, FromUtf8Error> {
        String::from_utf8(self.bytes)
    }

    /// Writes the contents to `sink`.
    pub fn write_to<W: io::Write + ?Sized>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_all(&self.bytes)
    }

    /// Key spans recorded by sorted map encoders that are still in progress.
    ///
    /// Encoders use this as a stack: each sorted map pushes its entries above
    /// the ones already present and truncates back before returning.
    #[inline]
    pub fn key_spans(&mut self) -> &mut Vec<KeySpan> {
        &mut self.spans
    }

    /// Sorts the key spans from index `from` onward by the bytes of their keys.
    pub fn sort_key_spans(&mut self, from: usize) {
        let bytes = &self.bytes;
        self.spans[from..]
            .sort_unstable_by(|a, b| bytes[a.start..a.end].cmp(&bytes[b.start..b.end]));
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("contents", &String::from_utf8_lossy(&self.bytes))
            .field("capacity", &self.bytes.capacity())
            .finish()
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Buffer> for Vec<u8> {
    fn from(buffer: Buffer) -> Self {
        buffer.bytes
    }
}

impl io::Write for Buffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    #[inline]
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.bytes.extend_from_slice(buf);
        Ok(())
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Write for Buffer {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.bytes.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_testhelpers::test;

    #[test]
    fn reset_keeps_capacity() {
        let mut buf = Buffer::with_capacity(64);
        buf.push_str("{\"a\":1}");
        let capacity = buf.capacity();
        buf.reset();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), capacity);
    }

    #[test]
    fn splice_out_removes_region() {
        let mut buf = Buffer::new();
        buf.push_str("{bbaa\"aa\":1,\"bb\":2");
        buf.splice_out(1..5);
        buf.push(b'}');
        assert_eq!(buf.as_str()?, r#"{"aa":1,"bb":2}"#);
    }

    #[test]
    fn sorts_spans_by_key_bytes() {
        let values = [1u8, 2, 3];
        let mut buf = Buffer::new();
        for (key, value) in ["-784", "-5467984", "12"].iter().zip(&values) {
            let start = buf.len();
            buf.push_str(key);
            let end = buf.len();
            buf.key_spans().push(KeySpan {
                start,
                end,
                value: PtrConst::new(value),
            });
        }
        buf.sort_key_spans(0);
        let order: Vec<u8> = buf
            .key_spans()
            .iter()
            .map(|span| unsafe { *span.value.get::<u8>() })
            .collect();
        assert_eq!(order, [2, 1, 3]);
    }

    #[test]
    fn writes_through_io_and_fmt() {
        use core::fmt::Write as _;

        let mut buf = Buffer::new();
        io::Write::write_all(&mut buf, b"[1,")?;
        write!(buf, "{}]", 2)?;
        let mut sink = Vec::new();
        buf.write_to(&mut sink)?;
        assert_eq!(sink, b"[1,2]");
    }
}
