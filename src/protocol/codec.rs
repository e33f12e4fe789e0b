//! Wire primitives: compact strings and arrays, zigzag integers, and the
//! length-prefixed response buffer.
//!
//! All integers are big-endian. Compact lengths are stored as `len + 1` in a
//! single byte; zero is reserved for null. Nothing here bounds-checks reads,
//! callers check `remaining()` first.

use bytes::{BufMut, Bytes, BytesMut};

pub const UUID_SIZE: usize = 16;

/// Decode an 8-bit zigzag value: `(n >> 1) ^ -(n & 1)`.
pub fn zigzag_decode8(n: u8) -> i8 {
    ((n >> 1) as i8) ^ -((n & 1) as i8)
}

/// Decode a 16-bit zigzag value.
pub fn zigzag_decode16(n: u16) -> i16 {
    ((n >> 1) as i16) ^ -((n & 1) as i16)
}

pub fn zigzag_encode8(v: i8) -> u8 {
    ((v << 1) ^ (v >> 7)) as u8
}

pub fn zigzag_encode16(v: i16) -> u16 {
    ((v << 1) ^ (v >> 15)) as u16
}

/// Combine a two-byte unsigned varint (7 low bits of the first byte, then the
/// second byte) into its raw value.
pub fn varint16(first: u8, second: u8) -> u16 {
    ((first & 0x7f) as u16) | ((second as u16) << 7)
}

/// Split a raw value below `1 << 15` into its two-byte varint form.
pub fn put_varint16(dst: &mut impl BufMut, v: u16) {
    dst.put_u8((v as u8 & 0x7f) | 0x80);
    dst.put_u8((v >> 7) as u8);
}

/// Write compact string (length+1, then utf8 bytes).
pub fn put_compact_string(dst: &mut impl BufMut, s: &str) {
    let bytes = s.as_bytes();
    dst.put_u8((bytes.len() + 1) as u8);
    dst.put_slice(bytes);
}

/// Write compact array length (count+1).
pub fn put_compact_array_len(dst: &mut impl BufMut, count: usize) {
    dst.put_u8((count + 1) as u8);
}

/// Growable response buffer. Every builder writes its body, then calls
/// [`ResponseBuilder::prepend_message_size`] exactly once before
/// [`ResponseBuilder::finish`].
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    buf: BytesMut,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(1024),
        }
    }

    pub fn put_i16(&mut self, v: i16) {
        self.buf.put_i16(v);
    }

    pub fn put_i32(&mut self, v: i32) {
        self.buf.put_i32(v);
    }

    pub fn put_u32(&mut self, v: u32) {
        self.buf.put_u32(v);
    }

    pub fn put_u8(&mut self, v: u8) {
        self.buf.put_u8(v);
    }

    pub fn put_slice(&mut self, b: &[u8]) {
        self.buf.extend_from_slice(b);
    }

    pub fn put_compact_string(&mut self, s: &str) {
        put_compact_string(&mut self.buf, s);
    }

    pub fn put_compact_array_len(&mut self, count: usize) {
        put_compact_array_len(&mut self.buf, count);
    }

    /// Empty tagged-field section.
    pub fn put_tag_buffer(&mut self) {
        self.buf.put_u8(0);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Prepend the 4-byte big-endian size of everything written so far.
    pub fn prepend_message_size(&mut self) {
        let len = self.buf.len() as i32;
        let mut out = BytesMut::with_capacity(4 + self.buf.len());
        out.put_i32(len);
        out.extend_from_slice(&self.buf);
        self.buf = out;
    }

    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }
}
