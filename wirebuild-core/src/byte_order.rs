//! Byte order conventions.
//!
//! A schema describes integers in its own natural byte order, while the
//! stream classes of the target language read and write in theirs. When the
//! two differ every multi-byte integer is byte-reversed at the read/write
//! site; when they match nothing is done.

use serde::Deserialize;

/// Byte order of a schema or of a target stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum ByteOrder {
    /// Little-endian byte order (default for schemas).
    #[default]
    #[serde(alias = "little", alias = "le", alias = "littleEndian")]
    LittleEndian,
    /// Big-endian byte order.
    #[serde(alias = "big", alias = "be", alias = "bigEndian")]
    BigEndian,
}

/// Pairing of the schema's byte order with the target stream's byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct ByteOrderPolicy {
    /// Order in which the schema's integers are laid out on the wire.
    pub schema: ByteOrder,
    /// Natural order of the stream the generated code reads and writes.
    pub stream: ByteOrder,
}

impl Default for ByteOrderPolicy {
    /// Little-endian schema read through a big-endian stream
    /// (`DataInput`/`DataOutputStream`).
    fn default() -> Self {
        Self {
            schema: ByteOrder::LittleEndian,
            stream: ByteOrder::BigEndian,
        }
    }
}

impl ByteOrderPolicy {
    /// Creates a policy from the two orders.
    #[must_use]
    pub const fn new(schema: ByteOrder, stream: ByteOrder) -> Self {
        Self { schema, stream }
    }

    /// Policy where schema and stream agree, so no value is ever adjusted.
    #[must_use]
    pub const fn matching(order: ByteOrder) -> Self {
        Self {
            schema: order,
            stream: order,
        }
    }

    /// Returns true if integers wider than one byte must be reversed.
    #[must_use]
    pub fn needs_swap(&self) -> bool {
        self.schema != self.stream
    }

    /// Returns true if a value of `width` bytes must be reversed.
    #[must_use]
    pub fn swaps(&self, width: usize) -> bool {
        width > 1 && self.needs_swap()
    }

    /// Adjusts a `width`-byte value read from (or about to be written to)
    /// the stream so that it carries the schema's meaning.
    ///
    /// The operation is its own inverse.
    #[must_use]
    pub fn maybe_swap(&self, width: usize, value: u64) -> u64 {
        if self.swaps(width) {
            swap_bytes(width, value)
        } else {
            value
        }
    }
}

/// Reverses the low `width` bytes of `value`. Bits above `width` bytes are
/// discarded.
#[must_use]
pub fn swap_bytes(width: usize, value: u64) -> u64 {
    match width {
        0 => 0,
        1 => value & 0xff,
        2 => u64::from((value as u16).swap_bytes()),
        4 => u64::from((value as u32).swap_bytes()),
        8 => value.swap_bytes(),
        n => {
            let n = n.min(8);
            let bytes = value.to_le_bytes();
            let mut out = [0u8; 8];
            for i in 0..n {
                out[i] = bytes[n - 1 - i];
            }
            u64::from_le_bytes(out)
        }
    }
}
