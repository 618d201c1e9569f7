//! Java code generation modules.

pub mod class;
pub mod enums;
pub mod file;
pub mod helpers;
pub mod method;

pub use class::StructEmitter;
pub use enums::EnumEmitter;
pub use file::{JavaFile, write_files};
pub use method::MethodBuilder;
