//! Centralizes all epoch arithmetic behind three named constructors. No other part of this
//! crate is allowed to do raw arithmetic on a timestamp integer; everything goes through
//! `Timestamp::from_webkit_us`, `from_unix_s`, or `from_unix_us`.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

// Offset of UNIX epoch (1970-01-01 00:00:00 UTC) from Windows FILETIME epoch
// (1601-01-01 00:00:00 UTC), in microseconds.
const WINDOWS_UNIX_EPOCH_OFFSET_MICROS: i128 = 11_644_473_600_000_000;

/// A point in time, normalized away from whichever epoch its source browser used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    /// Microseconds since 1601-01-01 UTC (most Chromium columns).
    pub fn from_webkit_us(webkit_us: i64) -> Self {
        let unix_nanos = webkit_us as i128 * 1000 - WINDOWS_UNIX_EPOCH_OFFSET_MICROS * 1000;
        Self(OffsetDateTime::from_unix_timestamp_nanos(unix_nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH))
    }

    /// Inverse of [`Self::from_webkit_us`].
    pub fn to_webkit_us(self) -> i64 {
        let unix_nanos = self.0.unix_timestamp_nanos();
        ((unix_nanos + WINDOWS_UNIX_EPOCH_OFFSET_MICROS * 1000) / 1000) as i64
    }

    /// Seconds since 1970-01-01 UTC.
    pub fn from_unix_s(unix_s: i64) -> Self {
        Self(OffsetDateTime::from_unix_timestamp(unix_s).unwrap_or(OffsetDateTime::UNIX_EPOCH))
    }

    /// Inverse of [`Self::from_unix_s`].
    pub fn to_unix_s(self) -> i64 {
        self.0.unix_timestamp()
    }

    /// Microseconds since 1970-01-01 UTC (Firefox `last_visit_date`, `dateAdded`).
    pub fn from_unix_us(unix_us: i64) -> Self {
        Self(
            OffsetDateTime::from_unix_timestamp_nanos(unix_us as i128 * 1000)
                .unwrap_or(OffsetDateTime::UNIX_EPOCH),
        )
    }

    /// Inverse of [`Self::from_unix_us`].
    pub fn to_unix_us(self) -> i64 {
        (self.0.unix_timestamp_nanos() / 1000) as i64
    }

    /// Chromium's password `date_created` is ambiguous in older profiles: if the raw integer
    /// exceeds "now" interpreted as Unix seconds, it must actually be a WebKit-epoch value;
    /// otherwise it's already Unix seconds.
    pub fn from_chromium_password_date_created(raw: i64) -> Self {
        Self::from_chromium_password_date_created_at(raw, OffsetDateTime::now_utc().unix_timestamp())
    }

    fn from_chromium_password_date_created_at(raw: i64, now_unix_s: i64) -> Self {
        if raw > now_unix_s {
            Self::from_webkit_us(raw)
        } else {
            Self::from_unix_s(raw)
        }
    }

    pub fn into_offset_date_time(self) -> OffsetDateTime {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.0.format(&Rfc3339).map_err(|_| std::fmt::Error)?
        )
    }
}

impl serde::Serialize for Timestamp {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webkit_round_trip() {
        let t = 13_200_000_000_000_000i64;
        assert_eq!(Timestamp::from_webkit_us(t).to_webkit_us(), t);
    }

    #[test]
    fn unix_seconds_round_trip() {
        let t = 1_600_000_000i64;
        assert_eq!(Timestamp::from_unix_s(t).to_unix_s(), t);
    }

    #[test]
    fn unix_micros_round_trip() {
        let t = 1_600_000_000_123_456i64;
        assert_eq!(Timestamp::from_unix_us(t).to_unix_us(), t);
    }

    #[test]
    fn webkit_epoch_matches_known_instant() {
        // 13200000000000000 webkit-us corresponds to 2019-04-12T00:00:00Z (see S3 fixture).
        let ts = Timestamp::from_webkit_us(13_200_000_000_000_000);
        assert_eq!(ts.to_unix_s(), 1_555_027_200);
    }

    #[test]
    fn chromium_ambiguous_date_created() {
        let now = 1_650_000_000i64;

        let plain = Timestamp::from_chromium_password_date_created_at(1_600_000_000, now);
        assert_eq!(plain.to_unix_s(), 1_600_000_000);

        let webkit = Timestamp::from_chromium_password_date_created_at(13_250_000_000_000_000, now);
        assert_eq!(webkit, Timestamp::from_webkit_us(13_250_000_000_000_000));
    }
}
