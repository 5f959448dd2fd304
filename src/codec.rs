//! Conversion between the 16-byte view and the `(a, b, c, d)` field view.
//!
//! The fields follow the conventional GUID grouping of 4, 2, 2, and 8 bytes. Every field is
//! stored big-endian, so byte 0 is the most significant byte of `a`.

use crate::{Error, Result};

/// The `(a, b, c, d)` field view of a COMB.
pub type Fields = (i32, i16, i16, [u8; 8]);

/// Packs the field view into the byte view.
pub const fn fields_to_bytes(a: i32, b: i16, c: i16, d: [u8; 8]) -> [u8; 16] {
    let a = a.to_be_bytes();
    let b = b.to_be_bytes();
    let c = c.to_be_bytes();
    [
        a[0], a[1], a[2], a[3], b[0], b[1], c[0], c[1], d[0], d[1], d[2], d[3], d[4], d[5], d[6],
        d[7],
    ]
}

/// Unpacks a byte slice into the field view.
///
/// # Errors
///
/// Returns [`Error::InvalidLength`] unless `bytes` is exactly 16 bytes long.
pub fn bytes_to_fields(bytes: &[u8]) -> Result<Fields> {
    let bytes = to_array(bytes)?;
    Ok(array_to_fields(&bytes))
}

/// Unpacks a 16-byte array into the field view.
pub const fn array_to_fields(bytes: &[u8; 16]) -> Fields {
    (
        i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        i16::from_be_bytes([bytes[4], bytes[5]]),
        i16::from_be_bytes([bytes[6], bytes[7]]),
        [
            bytes[8], bytes[9], bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15],
        ],
    )
}

/// Copies a slice into a 16-byte array.
pub(crate) fn to_array(bytes: &[u8]) -> Result<[u8; 16]> {
    <[u8; 16]>::try_from(bytes).map_err(|_| Error::InvalidLength { len: bytes.len() })
}
