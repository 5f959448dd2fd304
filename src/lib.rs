//! A Rust implementation of COMB identifiers: GUIDs that embed a timestamp so that they sort by
//! creation time under SQL Server's `uniqueidentifier` ordering
//!
//! ```rust
//! use combid::comb;
//!
//! let x = comb();
//! println!("{}", x); // e.g. "2f1a0000-350b-5b40-bfaa-7b4a11c7ae4b"
//! println!("{:?}", x.as_bytes()); // as 16-byte array
//! println!("{}", x.timestamp()); // embedded timestamp, e.g. "2024-05-01 09:30:00.123 UTC"
//! ```
//!
//! # Field and bit layout
//!
//! The 16 bytes form the conventional GUID fields `a` (4 bytes), `b` (2), `c` (2), and `d` (8),
//! each stored big-endian. A generated COMB carries the following layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |    days[1]    |   units[1]    |             rand              |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |    days[2]    |    days[3]    |    days[0]    |    0x40 | d  |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|   rand    |   units[0]    |   units[7]    |   units[6]    |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |   units[5]    |   units[4]    |   units[3]    |   units[2]    |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - `days[i]` is byte `i` of the little-endian 32-bit count of whole days since
//!   0001-01-01T00:00:00Z.
//! - `units[i]` is byte `i` of the little-endian IEEE 754 bit pattern of the time of day measured
//!   in units of 1/300 millisecond (milliseconds divided by `3.333333`).
//! - Byte 7 holds `0x40` combined with the low nibble `d` of `days[3]`.
//! - The 2-bit `var` field is set at `10`.
//! - The remaining 22 `rand` bits are filled with a cryptographically strong random number.
//!
//! SQL Server compares `uniqueidentifier` values starting from bytes 10 to 15, where the most
//! significant bytes of the time of day live, so COMBs generated later on the same day sort after
//! earlier ones (see [`order::COMPARE_ORDER`]). Timestamps from 0001-01-01T00:00:00Z through
//! 9999-12-31T23:59:05.999Z can be embedded.
//!
//! # Textual representations
//!
//! All five .NET `Guid` formats are supported for both parsing and formatting:
//!
//! ```rust
//! use combid::{Comb, Format};
//!
//! let x = Comb::parse("382c74c3-721d-4f34-80e5-57657b6cbc27")?;
//! assert_eq!(x.format(Format::N), "382c74c3721d4f3480e557657b6cbc27");
//! assert_eq!(x.format(Format::P), "(382c74c3-721d-4f34-80e5-57657b6cbc27)");
//! assert_eq!(
//!     x.to_string_as('X')?,
//!     "{0x382c74c3,0x721d,0x4f34,{0x80,0xe5,0x57,0x65,0x7b,0x6c,0xbc,0x27}}"
//! );
//! assert_eq!(Comb::try_parse("not-a-guid"), None);
//! # Ok::<(), combid::Error>(())
//! ```
//!
//! # Crate features
//!
//! - `global_gen` (default): enables the process-wide generator behind [`comb()`] and
//!   [`comb_at()`].
//! - `serde`: implements `Serialize` and `Deserialize` for [`Comb`].
//! - `uuid`: enables conversions between [`Comb`] and `uuid::Uuid`.
//! - `tracing`: emits `tracing` events from generation and parsing.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::{Error, Result};

pub mod codec;
pub mod order;
pub mod timestamp;

mod format;
pub use format::Format;

mod parser;

mod id;
pub use id::Comb;

pub mod generator;
pub use generator::CombGenerator;

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{comb, comb_at};
