//! # wirebuild Core
//!
//! Runtime building blocks shared by the schema engine, the code generator
//! and the reference codec.
//!
//! This crate provides:
//! - [`ByteOrder`] and [`ByteOrderPolicy`] with the `maybe_swap` adjustment
//!   applied to every multi-byte integer on the wire
//! - [`WireReader`] and [`WireWriter`] for stream-ordered integer access
//! - The dynamic [`Value`] model used to represent decoded types
//! - [`WireError`], the failures surfaced by generated code semantics

pub mod buffer;
pub mod byte_order;
pub mod error;
pub mod value;

pub use buffer::{WireReader, WireWriter};
pub use byte_order::{ByteOrder, ByteOrderPolicy, swap_bytes};
pub use error::{Result, WireError};
pub use value::{Record, Value};
