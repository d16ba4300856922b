use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the UTC offset of `canonical_timezone` at `instant`.
///
/// Returns [None] if `canonical_timezone` is not a valid, canonical timezone
/// name such as "Asia/Dubai".
pub(crate) fn get_zone_offset(
    canonical_timezone: &str,
    instant: OffsetDateTime,
) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&instant).to_utc())
}

/// Get the UTC offset of `canonical_timezone` at the current time.
pub(crate) fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    get_zone_offset(canonical_timezone, OffsetDateTime::now_utc())
}
