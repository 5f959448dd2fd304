//! Embedding of a point in time into a 16-byte COMB buffer.
//!
//! A timestamp is split into a whole-day count since [`min_date`] and the time of day measured in
//! accuracy units of 1/300 millisecond (see [`ACCURACY`]). The pieces are scattered across the
//! buffer so that a SQL Server `uniqueidentifier` comparison, which inspects bytes 10 to 15 first,
//! sees the most significant part of the time of day first:
//!
//! ```text
//! byte   0   1   2   3   4   5   6   7   8   9  10  11  12  13  14  15
//!      +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
//!      |d1 |u1 | r | r |d2 |d3 |d0 |ver|var|u0 |u7 |u6 |u5 |u4 |u3 |u2 |
//!      +---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+---+
//! ```
//!
//! Where `dN` is byte `N` of the little-endian day count, `uN` is byte `N` of the little-endian
//! IEEE 754 bit pattern of the time of day in accuracy units, `ver` is `0x40` combined with the low
//! nibble of `d3`, `var` carries the `10` variant bits over six random bits, and `r` is random.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, TimeZone, Timelike, Utc};

use crate::{Error, Result};

/// Milliseconds per accuracy unit of the embedded time of day.
pub const ACCURACY: f64 = 3.333333;

const MS_PER_DAY: i64 = 86_400_000;

/// Largest day count the layout can carry. Every day up to `max_date()` fits.
const MAX_DAYS: u32 = (1 << 28) - 1;

/// Returns the earliest embeddable timestamp, `0001-01-01T00:00:00Z`, which is also the epoch of
/// the day count.
pub fn min_date() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("combid: invalid MIN_DATE")
        .and_utc()
}

/// Returns the latest embeddable timestamp, `9999-12-31T23:59:05.999Z`.
pub fn max_date() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|date| date.and_hms_milli_opt(23, 59, 5, 999))
        .expect("combid: invalid MAX_DATE")
        .and_utc()
}

/// Writes `timestamp` into `bytes`, leaving the bytes not used by the layout untouched.
///
/// The timestamp is converted to UTC first.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if the timestamp lies outside `min_date()..=max_date()`.
pub fn encode<Tz: TimeZone>(bytes: &mut [u8; 16], timestamp: &DateTime<Tz>) -> Result<()> {
    let utc = timestamp.with_timezone(&Utc);
    if utc < min_date() || utc > max_date() {
        #[cfg(feature = "tracing")]
        tracing::debug!(%utc, "timestamp outside of embeddable range");
        return Err(Error::OutOfRange);
    }

    let days = u32::try_from(utc.date_naive().num_days_from_ce() - 1)
        .map_err(|_| Error::OutOfRange)?;
    // byte 7 keeps only the low nibble of the top day byte
    debug_assert!(days <= MAX_DAYS);

    let time = utc.time();
    // leap seconds are folded into the last regular second
    let nanos = time.nanosecond().min(999_999_999);
    let ms_of_day = f64::from(time.num_seconds_from_midnight()) * 1000.0 + f64::from(nanos) / 1e6;
    let units = ms_of_day / ACCURACY;

    let d = days.to_le_bytes();
    bytes[6] = d[0];
    bytes[0] = d[1];
    bytes[4] = d[2];
    bytes[5] = d[3];
    bytes[7] = 0x40 | (d[3] & 0x0f);

    let u = units.to_bits().to_le_bytes();
    bytes[8] = 0x80 | (bytes[8] & 0x3f);
    bytes[9] = u[0];
    bytes[1] = u[1];
    bytes[15] = u[2];
    bytes[14] = u[3];
    bytes[13] = u[4];
    bytes[12] = u[5];
    bytes[11] = u[6];
    bytes[10] = u[7];
    Ok(())
}

/// Reads the timestamp embedded in `bytes`.
///
/// Any 16 bytes decode to some timestamp; bytes that were not produced by [`encode`] yield a
/// meaningless one. Results beyond what [`DateTime`] can represent saturate.
pub fn decode(bytes: &[u8; 16]) -> DateTime<Utc> {
    offset_to_timestamp(decode_offset(bytes))
}

/// Reads the embedded timestamp as whole milliseconds elapsed since [`min_date`].
pub(crate) fn decode_offset(bytes: &[u8; 16]) -> i64 {
    let days = u32::from_le_bytes([bytes[6], bytes[0], bytes[4], bytes[5]]);
    let units = f64::from_bits(u64::from_le_bytes([
        bytes[9], bytes[1], bytes[15], bytes[14], bytes[13], bytes[12], bytes[11], bytes[10],
    ]));

    let ms_of_day = units * ACCURACY;
    // `as` saturates on overflow
    let ms_of_day = if ms_of_day.is_nan() {
        0
    } else {
        ms_of_day.round() as i64
    };
    (i64::from(days) * MS_PER_DAY).saturating_add(ms_of_day)
}

/// Converts a millisecond offset from [`min_date`] into a timestamp, saturating at the limits of
/// [`DateTime`].
pub(crate) fn offset_to_timestamp(offset: i64) -> DateTime<Utc> {
    TimeDelta::try_milliseconds(offset)
        .and_then(|delta| min_date().checked_add_signed(delta))
        .unwrap_or(if offset < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, max_date, min_date, MAX_DAYS};
    use crate::Error;
    use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeDelta, TimeZone, Utc};
    use rand::RngCore;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_milli_opt(h, mi, s, ms))
            .unwrap()
            .and_utc()
    }

    /// Encodes prepared timestamp into expected bytes
    #[test]
    fn encodes_prepared_timestamp_into_expected_bytes() {
        let mut bytes = [0u8; 16];
        encode(&mut bytes, &utc(2000, 1, 1, 0, 0, 0, 0)).unwrap();
        // 730119 days = 0x000b2407
        assert_eq!(
            bytes,
            [0x24, 0, 0, 0, 0x0b, 0x00, 0x07, 0x40, 0x80, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(decode(&bytes), utc(2000, 1, 1, 0, 0, 0, 0));
    }

    /// Decodes MIN_DATE and MAX_DATE exactly
    #[test]
    fn decodes_min_date_and_max_date_exactly() {
        for ts in [min_date(), max_date()] {
            let mut bytes = [0u8; 16];
            encode(&mut bytes, &ts).unwrap();
            assert_eq!(decode(&bytes), ts);
        }
        assert_eq!(decode(&[0u8; 16]), min_date());
    }

    /// Fits every embeddable day count into the layout
    #[test]
    fn fits_every_embeddable_day_count_into_the_layout() {
        let days = max_date().date_naive().num_days_from_ce() - 1;
        assert_eq!(days, 3_652_058);
        assert!(days <= MAX_DAYS as i32);

        let mut bytes = [0u8; 16];
        encode(&mut bytes, &max_date()).unwrap();
        assert_eq!(bytes[7] & 0xf0, 0x40);
        assert_eq!(bytes[5] & 0xf0, 0x00);
    }

    /// Rejects timestamps just outside the range
    #[test]
    fn rejects_timestamps_just_outside_the_range() {
        let mut bytes = [0u8; 16];
        let before = min_date() - TimeDelta::milliseconds(1);
        let after = max_date() + TimeDelta::milliseconds(1);
        assert_eq!(encode(&mut bytes, &before), Err(Error::OutOfRange));
        assert_eq!(encode(&mut bytes, &after), Err(Error::OutOfRange));
        assert_eq!(
            encode(&mut bytes, &utc(9999, 12, 31, 23, 59, 59, 999)),
            Err(Error::OutOfRange)
        );
        assert_eq!(bytes, [0u8; 16]);
    }

    /// Round-trips whole-millisecond timestamps across the range
    #[test]
    fn round_trips_whole_millisecond_timestamps_across_the_range() {
        let mut rng = rand::thread_rng();
        let span = (max_date() - min_date()).num_milliseconds() as u64;
        for _ in 0..10_000 {
            let ts = min_date() + TimeDelta::milliseconds((rng.next_u64() % span) as i64);
            let mut bytes = [0u8; 16];
            rng.fill_bytes(&mut bytes);
            encode(&mut bytes, &ts).unwrap();
            assert_eq!(decode(&bytes), ts);
        }
    }

    /// Loses at most one accuracy unit of sub-millisecond precision
    #[test]
    fn loses_at_most_one_accuracy_unit_of_sub_millisecond_precision() {
        let ts = utc(2024, 2, 29, 13, 37, 42, 123) + TimeDelta::microseconds(456);
        let mut bytes = [0u8; 16];
        encode(&mut bytes, &ts).unwrap();
        let delta = (decode(&bytes) - ts).num_microseconds().unwrap().abs();
        assert!(delta <= 3_334, "{delta}");
    }

    /// Converts non-UTC timestamps to UTC
    #[test]
    fn converts_non_utc_timestamps_to_utc() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let local = tokyo.with_ymd_and_hms(2024, 1, 1, 8, 30, 0).unwrap();
        let mut bytes = [0u8; 16];
        encode(&mut bytes, &local).unwrap();
        assert_eq!(decode(&bytes), utc(2023, 12, 31, 23, 30, 0, 0));
    }

    /// Keeps bytes outside of the layout untouched
    #[test]
    fn keeps_bytes_outside_of_the_layout_untouched() {
        let mut rng = rand::thread_rng();
        for _ in 0..1_000 {
            let mut bytes = [0u8; 16];
            rng.fill_bytes(&mut bytes);
            let orig = bytes;
            encode(&mut bytes, &Utc::now()).unwrap();
            assert_eq!(bytes[2..4], orig[2..4]);
            assert_eq!(bytes[8] & 0x3f, orig[8] & 0x3f);
            assert_eq!(bytes[7], 0x40);
            assert_eq!(bytes[8] & 0xc0, 0x80);
        }
    }

    /// Saturates when decoding arbitrary bytes
    #[test]
    fn saturates_when_decoding_arbitrary_bytes() {
        // NaN time of day with the largest day count
        assert_eq!(decode(&[0xff; 16]), DateTime::<Utc>::MAX_UTC);

        let mut rng = rand::thread_rng();
        for _ in 0..10_000 {
            let mut bytes = [0u8; 16];
            rng.fill_bytes(&mut bytes);
            let _ = decode(&bytes);
        }
    }
}
