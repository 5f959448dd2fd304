//! Error type shared by every fallible `Comb` operation.

use thiserror::Error;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All possible errors that `combid` can produce.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A byte view was not exactly 16 bytes long.
    #[error("invalid length: expected 16 bytes, got {len}")]
    InvalidLength {
        /// Length of the rejected input.
        len: usize,
    },

    /// A string did not match the requested (or any detectable) representation.
    #[error("invalid string representation")]
    Format,

    /// A format tag other than `N`, `D`, `B`, `P`, or `X` was given.
    #[error("unsupported format tag: {tag:?}")]
    UnsupportedFormat {
        /// The rejected tag.
        tag: char,
    },

    /// An empty string was given where a format tag was expected.
    #[error("missing format tag")]
    MissingFormat,

    /// A timestamp falls outside `MIN_DATE..=MAX_DATE`, or its day count does not fit the layout.
    #[error("timestamp out of range")]
    OutOfRange,
}

impl From<core::convert::Infallible> for Error {
    fn from(err: core::convert::Infallible) -> Self {
        match err {}
    }
}
