use core::{cmp, fmt, hash, str};

use chrono::{DateTime, TimeZone, Utc};
use fstr::FStr;

use crate::codec::{self, Fields};
use crate::{format, order, parser, timestamp, Error, Format, Result};

/// Represents a COMB: a 128-bit identifier that combines random bytes with an embedded timestamp.
///
/// The byte view is the big-endian `(a, b, c, d)` field view of a GUID. Comparison follows
/// SQL Server's `uniqueidentifier` ordering (see [`COMPARE_ORDER`](crate::order::COMPARE_ORDER)),
/// not the natural order of the byte view, so that COMBs generated later sort later within a day.
///
/// # Examples
///
/// ```rust
/// use combid::{Comb, Format};
///
/// let x = Comb::parse("382c74c3-721d-4f34-80e5-57657b6cbc27")?;
/// assert_eq!(x.format(Format::B), "{382c74c3-721d-4f34-80e5-57657b6cbc27}");
/// assert_eq!(x, Comb::parse_exact("382C74C3721D4F3480E557657B6CBC27", 'N')?);
/// # Ok::<(), combid::Error>(())
/// ```
#[derive(Copy, Clone)]
pub struct Comb {
    bytes: [u8; 16],

    /// Embedded timestamp in milliseconds since `MIN_DATE`, decoded once at construction.
    offset_ms: i64,
}

impl Comb {
    /// The all-zero COMB (`00000000-0000-0000-0000-000000000000`).
    ///
    /// This is a sentinel that is never generated; its timestamp decodes to `MIN_DATE`.
    pub const EMPTY: Self = Self {
        bytes: [0x00; 16],
        offset_ms: 0,
    };

    /// Creates an object from a 16-byte array.
    pub fn from_array(bytes: [u8; 16]) -> Self {
        Self {
            bytes,
            offset_ms: timestamp::decode_offset(&bytes),
        }
    }

    /// Creates an object from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] unless `bytes` is exactly 16 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        codec::to_array(bytes).map(Self::from_array)
    }

    /// Creates an object from the `(a, b, c, d)` field view.
    pub fn from_fields(a: i32, b: i16, c: i16, d: [u8; 8]) -> Self {
        Self::from_array(codec::fields_to_bytes(a, b, c, d))
    }

    /// Creates an object by embedding `ts` into `random_bytes`.
    ///
    /// This is the building block of [`CombGenerator`](crate::CombGenerator); callers supply 16
    /// freshly generated random bytes, of which bytes 2 and 3 and the low six bits of byte 8
    /// survive in the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `ts` lies outside `MIN_DATE..=MAX_DATE`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use combid::Comb;
    ///
    /// let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    /// let x = Comb::embed(rand::random(), &ts)?;
    /// assert_eq!(x.timestamp(), ts);
    /// # Ok::<(), combid::Error>(())
    /// ```
    pub fn embed<Tz: TimeZone>(mut random_bytes: [u8; 16], ts: &DateTime<Tz>) -> Result<Self> {
        timestamp::encode(&mut random_bytes, ts)?;
        Ok(Self::from_array(random_bytes))
    }

    /// Returns a reference to the underlying byte array.
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.bytes
    }

    /// Returns a copy of the underlying byte array.
    pub const fn to_bytes(self) -> [u8; 16] {
        self.bytes
    }

    /// Returns the `(a, b, c, d)` field view.
    pub const fn fields(&self) -> Fields {
        codec::array_to_fields(&self.bytes)
    }

    /// Returns the embedded timestamp.
    ///
    /// The value is quantized to whole milliseconds. COMBs that were not generated (e.g.
    /// [`Comb::EMPTY`] or arbitrary parsed values) yield a meaningless but well-defined timestamp.
    pub fn timestamp(&self) -> DateTime<Utc> {
        timestamp::offset_to_timestamp(self.offset_ms)
    }

    /// Returns `true` if this is [`Comb::EMPTY`].
    pub fn is_empty(&self) -> bool {
        self.bytes == [0x00; 16]
    }

    /// Parses any of the five textual representations, detecting the format from the input.
    ///
    /// Leading and trailing whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] if `src` matches none of the representations.
    pub fn parse(src: &str) -> Result<Self> {
        Self::try_parse(src).ok_or(Error::Format)
    }

    /// Parses the textual representation in `format`, given as a [`Format`] or a tag character.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] if `format` is an unknown tag and [`Error::Format`] if
    /// `src` does not match the format.
    pub fn parse_exact<F>(src: &str, format: F) -> Result<Self>
    where
        F: TryInto<Format>,
        Error: From<F::Error>,
    {
        let format = format.try_into()?;
        parser::parse_exact(src, format)
            .map(|(a, b, c, d)| Self::from_fields(a, b, c, d))
            .ok_or(Error::Format)
    }

    /// Parses any of the five textual representations, returning `None` on failure.
    pub fn try_parse(src: &str) -> Option<Self> {
        parser::parse(src).map(|(a, b, c, d)| Self::from_fields(a, b, c, d))
    }

    /// Parses the textual representation in `format`, returning `None` on failure or on an
    /// unknown tag.
    pub fn try_parse_exact<F: TryInto<Format>>(src: &str, format: F) -> Option<Self> {
        let format = format.try_into().ok()?;
        parser::parse_exact(src, format).map(|(a, b, c, d)| Self::from_fields(a, b, c, d))
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// string-like type that can be handled like [`str`] through [`Deref`](core::ops::Deref) and
    /// other common traits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use combid::Comb;
    ///
    /// let x = "382c74c3-721d-4f34-80e5-57657b6cbc27".parse::<Comb>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "382c74c3-721d-4f34-80e5-57657b6cbc27");
    /// assert_eq!(format!("{}", y), "382c74c3-721d-4f34-80e5-57657b6cbc27");
    /// # Ok::<(), combid::Error>(())
    /// ```
    pub fn encode(&self) -> FStr<36> {
        let mut buffer = [0u8; 36];
        format::write_ascii(&self.bytes, Format::D, &mut buffer);
        debug_assert!(buffer.is_ascii());
        // SAFETY: ok because buffer consists of ASCII bytes
        unsafe { FStr::from_bytes_unchecked(buffer) }
    }

    /// Returns the lower-case string representation in `format`.
    pub fn format(&self, format: Format) -> String {
        format::to_string(&self.bytes, format)
    }

    /// Returns the lower-case string representation in the format named by `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] if `tag` is not one of `N`, `D`, `B`, `P`, or `X`.
    pub fn to_string_as(&self, tag: char) -> Result<String> {
        Format::try_from(tag).map(|format| self.format(format))
    }
}

impl Default for Comb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl PartialEq for Comb {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Comb {}

impl PartialOrd for Comb {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Comb {
    /// Compares in SQL Server's `uniqueidentifier` order.
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        order::compare(&self.bytes, &other.bytes)
    }
}

impl hash::Hash for Comb {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Debug for Comb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Comb").field(&&*self.encode()).finish()
    }
}

impl fmt::Display for Comb {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Comb {
    type Err = Error;

    /// Creates an object from any of the five textual representations.
    fn from_str(src: &str) -> Result<Self> {
        Self::parse(src)
    }
}

impl From<Comb> for [u8; 16] {
    fn from(src: Comb) -> Self {
        src.bytes
    }
}

impl From<[u8; 16]> for Comb {
    fn from(src: [u8; 16]) -> Self {
        Self::from_array(src)
    }
}

impl TryFrom<&[u8]> for Comb {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self> {
        Self::from_bytes(src)
    }
}

impl AsRef<[u8]> for Comb {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Comb> for u128 {
    fn from(src: Comb) -> Self {
        Self::from_be_bytes(src.bytes)
    }
}

impl From<u128> for Comb {
    fn from(src: u128) -> Self {
        Self::from_array(src.to_be_bytes())
    }
}

impl From<Comb> for String {
    fn from(src: Comb) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Comb {
    type Error = Error;

    fn try_from(src: String) -> Result<Self> {
        src.parse()
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Comb;

    impl From<Comb> for uuid::Uuid {
        fn from(src: Comb) -> Self {
            uuid::Uuid::from_bytes(src.bytes)
        }
    }

    impl From<uuid::Uuid> for Comb {
        fn from(src: uuid::Uuid) -> Self {
            Self::from_array(src.into_bytes())
        }
    }

}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Comb};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Comb {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(self.as_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Comb {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Comb;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a COMB representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Self::Value::parse(value).map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Self::Value::from_bytes(value).map_err(de::Error::custom)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::Comb;
    use crate::{Error, Format};
    use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
    use std::collections::HashSet;

    const TEXT: &str = "382c74c3-721d-4f34-80e5-57657b6cbc27";

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .unwrap()
            .and_utc()
    }

    /// Returns a collection of random objects
    fn random_samples(n: usize) -> Vec<Comb> {
        (0..n).map(|_| Comb::from(rand::random::<[u8; 16]>())).collect()
    }

    /// Parses and formats prepared scenarios correctly
    #[test]
    fn parses_and_formats_prepared_scenarios_correctly() {
        assert_eq!(
            Comb::parse_exact("00000000000000000000000000000000", 'N'),
            Ok(Comb::EMPTY)
        );

        let x = Comb::parse(TEXT).unwrap();
        assert_eq!(
            x.to_string_as('B').unwrap(),
            "{382c74c3-721d-4f34-80e5-57657b6cbc27}"
        );
        assert_eq!(
            Comb::parse_exact(
                "{0x382c74c3,0x721d,0x4f34,{0x80,0xe5,0x57,0x65,0x7b,0x6c,0xbc,0x27}}",
                'X'
            ),
            Ok(x)
        );
        assert_eq!(
            x.fields(),
            (
                0x382c74c3,
                0x721d,
                0x4f34,
                [0x80, 0xe5, 0x57, 0x65, 0x7b, 0x6c, 0xbc, 0x27]
            )
        );

        assert_eq!(Comb::try_parse("not-a-guid"), None);
        assert_eq!(Comb::parse("not-a-guid"), Err(Error::Format));
        assert_eq!(
            Comb::from_bytes(&[0u8; 15]),
            Err(Error::InvalidLength { len: 15 })
        );
    }

    /// Returns Empty sentinel
    #[test]
    fn returns_empty_sentinel() {
        assert_eq!(Comb::EMPTY.to_bytes(), [0u8; 16]);
        assert_eq!(
            Comb::parse("00000000-0000-0000-0000-000000000000"),
            Ok(Comb::EMPTY)
        );
        assert_eq!(Comb::default(), Comb::EMPTY);
        assert!(Comb::EMPTY.is_empty());
        assert!(!Comb::parse(TEXT).unwrap().is_empty());
        assert_eq!(Comb::EMPTY.timestamp(), crate::timestamp::min_date());
        assert_eq!(Comb::from([0u8; 16]).timestamp(), Comb::EMPTY.timestamp());
        assert_eq!(
            &Comb::EMPTY.encode() as &str,
            "00000000-0000-0000-0000-000000000000"
        );
    }

    /// Rejects unknown format tags
    #[test]
    fn rejects_unknown_format_tags() {
        let x = Comb::parse(TEXT).unwrap();
        assert_eq!(
            x.to_string_as('G'),
            Err(Error::UnsupportedFormat { tag: 'G' })
        );
        assert_eq!(
            Comb::parse_exact(TEXT, 'G'),
            Err(Error::UnsupportedFormat { tag: 'G' })
        );
        assert_eq!(Comb::try_parse_exact(TEXT, 'G'), None);
        assert_eq!(Comb::try_parse_exact(TEXT, 'd'), Some(x));
        assert_eq!(Comb::try_parse_exact(TEXT, Format::D), Some(x));
    }

    /// Round-trips byte views
    #[test]
    fn round_trips_byte_views() {
        for e in random_samples(10_000) {
            let bytes = e.to_bytes();
            assert_eq!(Comb::from_bytes(&bytes).unwrap().to_bytes(), bytes);
            assert_eq!(Comb::try_from(&bytes[..]), Ok(e));
            assert_eq!(Comb::from(<[u8; 16]>::from(e)), e);
            assert_eq!(Comb::from(u128::from(e)), e);
            let (a, b, c, d) = e.fields();
            assert_eq!(Comb::from_fields(a, b, c, d), e);
        }
    }

    /// Round-trips every textual representation
    #[test]
    fn round_trips_every_textual_representation() {
        for e in random_samples(10_000) {
            for format in Format::ALL {
                let text = e.format(format);
                assert_eq!(Comb::parse_exact(&text, format), Ok(e), "{text}");
                assert_eq!(Comb::parse(&text), Ok(e), "{text}");
                assert_eq!(Comb::parse(&text.to_uppercase()), Ok(e), "{text}");
            }
            assert_eq!(&e.encode() as &str, e.format(Format::D));
            assert_eq!(e.to_string(), e.format(Format::D));
            assert_eq!(Comb::try_from(String::from(e)), Ok(e));
            assert!(Comb::parse_exact(&e.format(Format::D), 'X').is_err());
        }
    }

    /// Preserves embedded timestamp through text and bytes
    #[test]
    fn preserves_embedded_timestamp_through_text_and_bytes() {
        let ts = utc(2024, 5, 1, 12, 34, 56) + TimeDelta::milliseconds(789);
        let x = Comb::embed(rand::random(), &ts).unwrap();
        assert_eq!(x.timestamp(), ts);
        assert_eq!(Comb::parse(&x.format(Format::X)).unwrap().timestamp(), ts);
        assert_eq!(Comb::from(x.to_bytes()).timestamp(), ts);
    }

    /// Sorts by embedded timestamp within a day
    #[test]
    fn sorts_by_embedded_timestamp_within_a_day() {
        let earlier = Comb::embed(rand::random(), &utc(2024, 5, 1, 12, 0, 0)).unwrap();
        let later = Comb::embed(rand::random(), &utc(2024, 5, 1, 12, 0, 1)).unwrap();
        assert!(earlier < later);

        let start = utc(2024, 5, 1, 0, 0, 0);
        let mut prev = Comb::embed(rand::random(), &start).unwrap();
        for i in 1..10_000 {
            let ts = start + TimeDelta::milliseconds(i * 5);
            let curr = Comb::embed(rand::random(), &ts).unwrap();
            assert!(prev < curr, "{ts}");
            prev = curr;
        }
    }

    /// Satisfies total order and hash consistency
    #[test]
    fn satisfies_total_order_and_hash_consistency() {
        use std::collections::hash_map::RandomState;
        use std::hash::BuildHasher;
        let hasher = RandomState::new();

        let mut samples = random_samples(1_000);
        let duplicates = samples[..100].to_vec();
        samples.extend(duplicates);
        for x in &samples[..200] {
            for y in &samples {
                assert_eq!(x.cmp(y), y.cmp(x).reverse());
                assert_eq!(x == y, x.cmp(y).is_eq());
                if x == y {
                    assert_eq!(hasher.hash_one(x), hasher.hash_one(y));
                }
            }
        }

        samples.sort();
        for w in samples.windows(3) {
            assert!(w[0] <= w[1] && w[1] <= w[2] && w[0] <= w[2]);
        }

        let unique: HashSet<Comb> = samples.iter().copied().collect();
        assert_eq!(unique.len(), 1_000);
    }

    /// Formats debug output with canonical text
    #[test]
    fn formats_debug_output_with_canonical_text() {
        let x = Comb::parse(TEXT).unwrap();
        assert_eq!(
            format!("{x:?}"),
            "Comb(\"382c74c3-721d-4f34-80e5-57657b6cbc27\")"
        );
    }

    /// Encodes the stack string identically to the D format
    #[test]
    fn encodes_the_stack_string_identically_to_the_d_format() {
        for e in random_samples(1_000).into_iter().chain([Comb::EMPTY]) {
            let encoded = e.encode();
            assert_eq!(encoded.len(), 36);
            assert_eq!(&encoded as &str, e.format(Format::D));
            assert_eq!(e.to_string(), e.format(Format::D));
        }
    }
}
