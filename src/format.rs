//! Textual representations and their rendering.

use core::{fmt, str};

use crate::{Error, Result};

/// One of the five textual representations of a COMB, named after the single-character tags
/// used by .NET's `Guid.ToString(format)`.
///
/// | Tag | Example |
/// | --- | ------- |
/// | `N` | `382c74c3721d4f3480e557657b6cbc27` |
/// | `D` | `382c74c3-721d-4f34-80e5-57657b6cbc27` |
/// | `B` | `{382c74c3-721d-4f34-80e5-57657b6cbc27}` |
/// | `P` | `(382c74c3-721d-4f34-80e5-57657b6cbc27)` |
/// | `X` | `{0x382c74c3,0x721d,0x4f34,{0x80,0xe5,0x57,0x65,0x7b,0x6c,0xbc,0x27}}` |
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Format {
    /// 32 digits.
    N,
    /// 32 digits separated by hyphens; the canonical form.
    #[default]
    D,
    /// `D` enclosed in braces.
    B,
    /// `D` enclosed in parentheses.
    P,
    /// C-style initializer list of hexadecimal literals.
    X,
}

/// Rendering and parsing parameters of a [`Format`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Layout {
    /// Fixed-width digit groups, optionally hyphenated and bracketed.
    Grouped {
        hyphens: bool,
        brackets: Option<(u8, u8)>,
    },
    /// `{0xa,0xb,0xc,{0xd0,...,0xd7}}`
    HexList,
}

impl Format {
    /// All formats, in tag order.
    pub const ALL: [Self; 5] = [Self::N, Self::D, Self::B, Self::P, Self::X];

    /// Returns the upper-case tag character.
    pub const fn tag(self) -> char {
        match self {
            Self::N => 'N',
            Self::D => 'D',
            Self::B => 'B',
            Self::P => 'P',
            Self::X => 'X',
        }
    }

    /// Looks up a format by its tag, ignoring case.
    pub const fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'N' | 'n' => Some(Self::N),
            'D' | 'd' => Some(Self::D),
            'B' | 'b' => Some(Self::B),
            'P' | 'p' => Some(Self::P),
            'X' | 'x' => Some(Self::X),
            _ => None,
        }
    }

    /// Returns the length of the rendered text.
    pub const fn text_len(self) -> usize {
        match self {
            Self::N => 32,
            Self::D => 36,
            Self::B | Self::P => 38,
            Self::X => 68,
        }
    }

    pub(crate) const fn layout(self) -> Layout {
        match self {
            Self::N => Layout::Grouped {
                hyphens: false,
                brackets: None,
            },
            Self::D => Layout::Grouped {
                hyphens: true,
                brackets: None,
            },
            Self::B => Layout::Grouped {
                hyphens: true,
                brackets: Some((b'{', b'}')),
            },
            Self::P => Layout::Grouped {
                hyphens: true,
                brackets: Some((b'(', b')')),
            },
            Self::X => Layout::HexList,
        }
    }
}

impl TryFrom<char> for Format {
    type Error = Error;

    fn try_from(tag: char) -> Result<Self> {
        Self::from_tag(tag).ok_or(Error::UnsupportedFormat { tag })
    }
}

impl str::FromStr for Format {
    type Err = Error;

    /// Parses a single-character tag such as `"D"` or `"x"`.
    fn from_str(src: &str) -> Result<Self> {
        let mut chars = src.chars();
        match (chars.next(), chars.next()) {
            (Some(tag), None) => Self::try_from(tag),
            (Some(tag), Some(_)) => Err(Error::UnsupportedFormat { tag }),
            (None, _) => Err(Error::MissingFormat),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Longest rendered text over all formats.
pub(crate) const MAX_TEXT_LEN: usize = 68;

/// Renders `bytes` in `format` into the head of `buffer`, returning the number of bytes written.
///
/// All digits are lower case.
///
/// # Panics
///
/// Panics if `buffer` is shorter than `format.text_len()`.
pub(crate) fn write_ascii(bytes: &[u8; 16], format: Format, buffer: &mut [u8]) -> usize {
    let mut w = AsciiWriter { buffer, pos: 0 };
    match format.layout() {
        Layout::Grouped { hyphens, brackets } => {
            if let Some((open, _)) = brackets {
                w.push(open);
            }
            for (i, &e) in bytes.iter().enumerate() {
                w.push_hex(e);
                if hyphens && matches!(i, 3 | 5 | 7 | 9) {
                    w.push(b'-');
                }
            }
            if let Some((_, close)) = brackets {
                w.push(close);
            }
        }
        Layout::HexList => {
            w.push_str(b"{0x");
            bytes[..4].iter().for_each(|&e| w.push_hex(e));
            w.push_str(b",0x");
            bytes[4..6].iter().for_each(|&e| w.push_hex(e));
            w.push_str(b",0x");
            bytes[6..8].iter().for_each(|&e| w.push_hex(e));
            w.push_str(b",{");
            for (i, &e) in bytes[8..].iter().enumerate() {
                if i > 0 {
                    w.push(b',');
                }
                w.push_str(b"0x");
                w.push_hex(e);
            }
            w.push_str(b"}}");
        }
    }
    debug_assert_eq!(w.pos, format.text_len());
    w.pos
}

/// Renders `bytes` in `format` as a new `String`.
pub(crate) fn to_string(bytes: &[u8; 16], format: Format) -> String {
    let mut buffer = [0u8; MAX_TEXT_LEN];
    let len = write_ascii(bytes, format, &mut buffer);
    buffer[..len].iter().copied().map(char::from).collect()
}

struct AsciiWriter<'a> {
    buffer: &'a mut [u8],
    pos: usize,
}

impl AsciiWriter<'_> {
    fn push(&mut self, c: u8) {
        self.buffer[self.pos] = c;
        self.pos += 1;
    }

    fn push_str(&mut self, s: &[u8]) {
        s.iter().for_each(|&c| self.push(c));
    }

    fn push_hex(&mut self, e: u8) {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";
        self.push(DIGITS[(e >> 4) as usize]);
        self.push(DIGITS[(e & 15) as usize]);
    }
}
