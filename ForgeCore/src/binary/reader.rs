//! Primitive readers over any `std::io::Read`

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use half::f16;
use std::io::{ErrorKind, Read};

use crate::error::{Error, Result};

/// Byte order of a single read.
///
/// Newer titles are little-endian throughout, older ones big-endian, so
/// little is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

/// Read an unsigned 8-bit integer.
pub fn read_u8<R: Read + ?Sized>(reader: &mut R) -> Result<u8> {
    Ok(reader.read_u8()?)
}

/// Read a signed 8-bit integer.
pub fn read_i8<R: Read + ?Sized>(reader: &mut R) -> Result<i8> {
    Ok(reader.read_i8()?)
}

/// Read an unsigned 16-bit integer.
pub fn read_u16<R: Read + ?Sized>(reader: &mut R, endian: Endian) -> Result<u16> {
    let value = match endian {
        Endian::Little => reader.read_u16::<LittleEndian>()?,
        Endian::Big => reader.read_u16::<BigEndian>()?,
    };
    Ok(value)
}

/// Read a signed 16-bit integer.
pub fn read_i16<R: Read + ?Sized>(reader: &mut R, endian: Endian) -> Result<i16> {
    let value = match endian {
        Endian::Little => reader.read_i16::<LittleEndian>()?,
        Endian::Big => reader.read_i16::<BigEndian>()?,
    };
    Ok(value)
}

/// Read an unsigned 32-bit integer.
pub fn read_u32<R: Read + ?Sized>(reader: &mut R, endian: Endian) -> Result<u32> {
    let value = match endian {
        Endian::Little => reader.read_u32::<LittleEndian>()?,
        Endian::Big => reader.read_u32::<BigEndian>()?,
    };
    Ok(value)
}

/// Read a signed 32-bit integer.
pub fn read_i32<R: Read + ?Sized>(reader: &mut R, endian: Endian) -> Result<i32> {
    let value = match endian {
        Endian::Little => reader.read_i32::<LittleEndian>()?,
        Endian::Big => reader.read_i32::<BigEndian>()?,
    };
    Ok(value)
}

/// Read an unsigned integer of `width` bytes (1, 2 or 4).
///
/// # Errors
/// Returns [`Error::InvalidWidth`] for any other width and
/// [`Error::UnexpectedEof`] if the stream ends first.
pub fn read_uint<R: Read + ?Sized>(reader: &mut R, width: usize, endian: Endian) -> Result<u32> {
    match width {
        1 => read_u8(reader).map(u32::from),
        2 => read_u16(reader, endian).map(u32::from),
        4 => read_u32(reader, endian),
        _ => Err(Error::InvalidWidth { width }),
    }
}

/// Read a signed integer of `width` bytes (1, 2 or 4), sign-extended to `i32`.
///
/// # Errors
/// Same as [`read_uint`].
pub fn read_int<R: Read + ?Sized>(reader: &mut R, width: usize, endian: Endian) -> Result<i32> {
    match width {
        1 => read_i8(reader).map(i32::from),
        2 => read_i16(reader, endian).map(i32::from),
        4 => read_i32(reader, endian),
        _ => Err(Error::InvalidWidth { width }),
    }
}

/// Read an IEEE 754 single-precision float.
pub fn read_f32<R: Read + ?Sized>(reader: &mut R, endian: Endian) -> Result<f32> {
    let value = match endian {
        Endian::Little => reader.read_f32::<LittleEndian>()?,
        Endian::Big => reader.read_f32::<BigEndian>()?,
    };
    Ok(value)
}

/// Read an IEEE 754 half-precision float, widened to `f32`.
pub fn read_f16<R: Read + ?Sized>(reader: &mut R, endian: Endian) -> Result<f32> {
    let bits = read_u16(reader, endian)?;
    Ok(f16::from_bits(bits).to_f32())
}

/// Read `N` consecutive floats, e.g. a position or a w-first quaternion.
pub fn read_f32_array<const N: usize, R: Read + ?Sized>(
    reader: &mut R,
    endian: Endian,
) -> Result<[f32; N]> {
    let mut values = [0.0f32; N];
    for value in &mut values {
        *value = read_f32(reader, endian)?;
    }
    Ok(values)
}

/// Read a NUL-terminated UTF-8 string.
///
/// Consumes bytes up to and including the terminator, or to the end of the
/// stream if there is none. The terminator is not part of the result.
pub fn read_cstring<R: Read + ?Sized>(reader: &mut R) -> Result<String> {
    let mut bytes = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => break,
            Ok(_) if byte[0] == 0 => break,
            Ok(_) => bytes.push(byte[0]),
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(String::from_utf8(bytes)?)
}

/// Read exactly `len` bytes as a UTF-8 string.
///
/// Embedded or trailing NULs are kept; the caller decides whether the field
/// is padded. The buffer grows with the bytes actually read, so a length
/// taken from a corrupt header fails with [`Error::UnexpectedEof`].
pub fn read_fixed_string<R: Read + ?Sized>(reader: &mut R, len: usize) -> Result<String> {
    let mut bytes = Vec::new();
    Read::take(&mut *reader, len as u64).read_to_end(&mut bytes)?;
    if bytes.len() < len {
        return Err(Error::UnexpectedEof);
    }
    Ok(String::from_utf8(bytes)?)
}
