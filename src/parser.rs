//! Cursor-based recognizer for the five textual representations.
//!
//! Every attempt runs from the start of the (trimmed) input to its end and either produces the
//! whole field view or nothing. The cursor only moves forward within an attempt; [`Parser::parse`]
//! rewinds it before trying a format so that the same parser can fall back to another one.

use crate::codec::Fields;
use crate::format::{Format, Layout};

/// Parses `src`, detecting the format from its length and leading character.
///
/// A 32-, 36-, or 38-character input is tried as `N`, `D`, or `B`/`P` respectively, and any other
/// input starting with `{` as `X`. A `{`-leading input that fails its detected grouped format is
/// retried as `X` as well. Since a valid `X` text is at least 47 characters long, that retry never
/// succeeds for such inputs; it only keeps the documented fallback order.
pub(crate) fn parse(src: &str) -> Option<Fields> {
    let mut parser = Parser::new(src);
    let detected = parser.detect();
    if let Some(fields) = detected.and_then(|format| parser.parse(format)) {
        return Some(fields);
    }

    if detected != Some(Format::X) && parser.src.starts_with('{') {
        #[cfg(feature = "tracing")]
        tracing::trace!(?detected, "falling back to hex list format");
        return parser.parse(Format::X);
    }
    None
}

/// Parses `src` in `format` only.
pub(crate) fn parse_exact(src: &str, format: Format) -> Option<Fields> {
    Parser::new(src).parse(format)
}

/// A forward-only cursor over trimmed input.
#[derive(Clone, Debug)]
pub(crate) struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser over `src` with leading and trailing whitespace removed.
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.trim(),
            pos: 0,
        }
    }

    /// Guesses the format from the input length and leading character.
    pub fn detect(&self) -> Option<Format> {
        match (self.src.len(), self.src.as_bytes().first().copied()) {
            (32, _) => Some(Format::N),
            (36, _) => Some(Format::D),
            (38, Some(b'{')) => Some(Format::B),
            (38, Some(b'(')) => Some(Format::P),
            (_, Some(b'{')) => Some(Format::X),
            _ => None,
        }
    }

    /// Rewinds the cursor and parses the whole input in `format`.
    pub fn parse(&mut self, format: Format) -> Option<Fields> {
        self.pos = 0;
        match format.layout() {
            Layout::Grouped { hyphens, brackets } => self.parse_grouped(hyphens, brackets),
            Layout::HexList => self.parse_hex_list(),
        }
    }

    /// `N`, `D`, `B`, and `P`: fixed-width groups of 8-4-4-4-12 digits.
    fn parse_grouped(&mut self, hyphens: bool, brackets: Option<(u8, u8)>) -> Option<Fields> {
        if let Some((open, _)) = brackets {
            self.expect(open)?;
        }

        let a = self.hex_exact(8)? as u32;
        self.separator(hyphens)?;
        let b = self.hex_exact(4)? as u16;
        self.separator(hyphens)?;
        let c = self.hex_exact(4)? as u16;
        self.separator(hyphens)?;

        let mut d = [0u8; 8];
        for (i, e) in d.iter_mut().enumerate() {
            if i == 2 {
                self.separator(hyphens)?;
            }
            *e = self.hex_exact(2)? as u8;
        }

        if let Some((_, close)) = brackets {
            self.expect(close)?;
        }
        self.end()?;
        Some((a as i32, b as i16, c as i16, d))
    }

    /// `X`: `{0xa,0xb,0xc,{0xd0,0xd1,0xd2,0xd3,0xd4,0xd5,0xd6,0xd7}}`, where each literal may have
    /// fewer digits than its field width and whitespace may surround every token.
    fn parse_hex_list(&mut self) -> Option<Fields> {
        self.expect(b'{')?;
        let a = self.hex_literal(8)? as u32;
        self.expect_padded(b',')?;
        let b = self.hex_literal(4)? as u16;
        self.expect_padded(b',')?;
        let c = self.hex_literal(4)? as u16;
        self.expect_padded(b',')?;
        self.expect_padded(b'{')?;

        let mut d = [0u8; 8];
        for (i, e) in d.iter_mut().enumerate() {
            if i > 0 {
                self.expect_padded(b',')?;
            }
            *e = self.hex_literal(2)? as u8;
        }

        self.expect_padded(b'}')?;
        self.expect_padded(b'}')?;
        self.end()?;
        Some((a as i32, b as i16, c as i16, d))
    }

    fn rest(&self) -> &'a [u8] {
        &self.src.as_bytes()[self.pos..]
    }

    fn expect(&mut self, c: u8) -> Option<()> {
        if self.rest().first() == Some(&c) {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }

    fn expect_padded(&mut self, c: u8) -> Option<()> {
        self.skip_whitespace();
        self.expect(c)
    }

    fn separator(&mut self, hyphens: bool) -> Option<()> {
        if hyphens {
            self.expect(b'-')
        } else {
            Some(())
        }
    }

    fn end(&self) -> Option<()> {
        self.rest().is_empty().then_some(())
    }

    fn skip_whitespace(&mut self) {
        // the cursor only ever stops on char boundaries
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Consumes exactly `digits` hexadecimal digits.
    fn hex_exact(&mut self, digits: usize) -> Option<u64> {
        let rest = self.rest().get(..digits)?;
        let mut value = 0u64;
        for &c in rest {
            value = (value << 4) | u64::from(hex_value(c)?);
        }
        self.pos += digits;
        Some(value)
    }

    /// Consumes one to `max_digits` hexadecimal digits.
    fn hex_up_to(&mut self, max_digits: usize) -> Option<u64> {
        let digits = self
            .rest()
            .iter()
            .take(max_digits)
            .take_while(|c| c.is_ascii_hexdigit())
            .count();
        if digits == 0 {
            return None;
        }
        self.hex_exact(digits)
    }

    /// Consumes optional whitespace, a `0x` or `0X` prefix, and up to `max_digits` digits.
    fn hex_literal(&mut self, max_digits: usize) -> Option<u64> {
        self.skip_whitespace();
        self.expect(b'0')?;
        if self.expect(b'x').is_none() {
            self.expect(b'X')?;
        }
        self.hex_up_to(max_digits)
    }
}

fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
