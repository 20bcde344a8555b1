//! Endian-aware primitive decoding for container tables
//!
//! Every read takes its byte order as an argument: some titles store
//! big-endian headers in front of little-endian payloads, so a stream never
//! has a fixed endianness. The functions keep no state of their own; the
//! stream's cursor is the only position that moves.

mod reader;

pub use reader::{
    Endian, read_cstring, read_f16, read_f32, read_f32_array, read_fixed_string, read_i8,
    read_i16, read_i32, read_int, read_u8, read_u16, read_u32, read_uint,
};
