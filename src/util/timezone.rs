//! Conversion from site-local wall-clock times to stored UTC instants.

use chrono::{NaiveDate, TimeZone};
use chrono_tz::Tz;
use time::{Date, OffsetDateTime, Time};

/// Interpret a calendar date and wall-clock time in the site timezone and
/// return the corresponding UTC instant.
///
/// Ambiguous local times (the repeated hour when clocks fall back) resolve
/// to the earlier instant; local times skipped by a forward jump fall back
/// to a UTC reading of the same wall time.
pub fn utc_from_local(date: Date, time: Time, tz: Tz) -> OffsetDateTime {
    let naive_date = NaiveDate::from_ymd_opt(date.year(), date.month() as u32, date.day() as u32)
        .expect("calendar date from the time crate is valid for chrono");
    let naive = naive_date
        .and_hms_opt(
            u32::from(time.hour()),
            u32::from(time.minute()),
            u32::from(time.second()),
        )
        .expect("wall-clock time from the time crate is valid for chrono");

    let timestamp = tz
        .from_local_datetime(&naive)
        .earliest()
        .map(|instant| instant.timestamp())
        .unwrap_or_else(|| naive.and_utc().timestamp());

    OffsetDateTime::from_unix_timestamp(timestamp)
        .expect("unix timestamp from chrono is within the supported range")
}
