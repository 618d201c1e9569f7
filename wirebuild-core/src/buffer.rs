//! Stream-ordered readers and writers.
//!
//! This module provides:
//! - [`WireReader`] for consuming integers and raw bytes from a slice
//! - [`WireWriter`] for appending integers and raw bytes to a growable buffer
//!
//! Both access integers in the *stream's* natural order and apply the
//! [`ByteOrderPolicy`] adjustment, which is exactly what generated code does
//! around `DataInput`/`DataOutputStream`.

use crate::byte_order::{ByteOrder, ByteOrderPolicy};
use crate::error::{Result, WireError};
use bytes::{Buf, BufMut, BytesMut};

/// Cursor over an input slice.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    policy: ByteOrderPolicy,
    consumed: usize,
}

impl<'a> WireReader<'a> {
    /// Wraps a byte slice.
    #[must_use]
    pub fn new(buf: &'a [u8], policy: ByteOrderPolicy) -> Self {
        Self {
            buf,
            policy,
            consumed: 0,
        }
    }

    /// Returns the number of bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Returns the number of bytes consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.consumed
    }

    fn ensure(&self, required: usize) -> Result<()> {
        if self.buf.remaining() < required {
            return Err(WireError::UnexpectedEof {
                required,
                available: self.buf.remaining(),
            });
        }
        Ok(())
    }

    /// Reads a `width`-byte unsigned integer and applies the byte order
    /// adjustment.
    ///
    /// # Errors
    /// Returns `WireError::UnexpectedEof` if fewer than `width` bytes remain.
    pub fn read_uint(&mut self, width: usize) -> Result<u64> {
        self.ensure(width)?;
        let raw = match self.policy.stream {
            ByteOrder::BigEndian => self.buf.get_uint(width),
            ByteOrder::LittleEndian => self.buf.get_uint_le(width),
        };
        self.consumed += width;
        Ok(self.policy.maybe_swap(width, raw))
    }

    /// Reads a single raw byte.
    ///
    /// # Errors
    /// Returns `WireError::UnexpectedEof` if the input is exhausted.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        self.consumed += 1;
        Ok(self.buf.get_u8())
    }

    /// Reads `len` raw bytes.
    ///
    /// # Errors
    /// Returns `WireError::UnexpectedEof` if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        self.ensure(len)?;
        let mut out = vec![0u8; len];
        self.buf.copy_to_slice(&mut out);
        self.consumed += len;
        Ok(out)
    }
}

/// Growable output buffer.
#[derive(Debug, Clone)]
pub struct WireWriter {
    buf: BytesMut,
    policy: ByteOrderPolicy,
}

impl WireWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new(policy: ByteOrderPolicy) -> Self {
        Self {
            buf: BytesMut::new(),
            policy,
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes a `width`-byte integer after the byte order adjustment.
    /// Bits above `width` bytes are truncated, like a narrowing cast.
    pub fn write_uint(&mut self, width: usize, value: u64) {
        let adjusted = self.policy.maybe_swap(width, value);
        match self.policy.stream {
            ByteOrder::BigEndian => self.buf.put_uint(truncate(width, adjusted), width),
            ByteOrder::LittleEndian => self.buf.put_uint_le(truncate(width, adjusted), width),
        }
    }

    /// Writes a single raw byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    /// Writes raw bytes verbatim.
    pub fn write_bytes(&mut self, src: &[u8]) {
        self.buf.put_slice(src);
    }

    /// Consumes the writer and returns the written bytes.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}

fn truncate(width: usize, value: u64) -> u64 {
    if width >= 8 {
        value
    } else {
        value & ((1u64 << (width * 8)) - 1)
    }
}
