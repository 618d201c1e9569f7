//! # wirebuild codec
//!
//! Executes resolved schema layouts directly against byte buffers.
//!
//! The codec follows the same flattened field order, size-source
//! derivation, guard rules, buffer length contract and enum membership as
//! the generated classes, which makes the wire contract testable without a
//! Java toolchain.

pub mod codec;
pub mod error;

pub use codec::{Codec, Naming};
pub use error::{CodecError, Result};
