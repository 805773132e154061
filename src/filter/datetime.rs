//! Date and time normalization for availability filters
//!
//! Date pickers hand over a `YYYY-MM-DD` date and independent `HH:mm` times.
//! The query backend expects ISO-8601 timestamps that carry the offset of the
//! user's timezone rather than UTC-normalized instants.

use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime,
    SecondsFormat, TimeZone,
};

use crate::error::{AppError, AppResult};

/// Which end of a time window a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Parse a `YYYY-MM-DD` date. An empty string means "unset".
pub fn parse_date(value: &str) -> AppResult<Option<NaiveDate>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| AppError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", value)))
}

/// Parse a `HH:mm` or `HH:mm:ss` time. An empty string means "unset".
pub fn parse_time(value: &str) -> AppResult<Option<NaiveTime>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map(Some)
        .map_err(|_| AppError::Validation(format!("Invalid time '{}', expected HH:mm", value)))
}

/// Interpret `date` + `time` as wall-clock time in `tz` and attach the offset.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant.
/// Times skipped by a DST jump move forward to the first minute that exists.
pub fn create_iso_string_from_date_time<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    time: NaiveTime,
) -> DateTime<FixedOffset> {
    resolve_local(tz, date.and_time(time))
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<FixedOffset> {
    let mut candidate = local;
    // DST gaps are at most a few hours wide
    for _ in 0..=24 * 60 {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) => return dt.fixed_offset(),
            LocalResult::Ambiguous(earliest, _) => return earliest.fixed_offset(),
            LocalResult::None => candidate += Duration::minutes(1),
        }
    }
    tz.from_utc_datetime(&local).fixed_offset()
}

/// Compose a timestamp for `date` using the default time of `bound`
pub fn create_iso_string_from_date<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    bound: Bound,
    defaults: (NaiveTime, NaiveTime),
) -> DateTime<FixedOffset> {
    let time = match bound {
        Bound::Start => defaults.0,
        Bound::End => defaults.1,
    };
    create_iso_string_from_date_time(tz, date, time)
}

/// `YYYY-MM-DDTHH:MM:SS±HH:MM`, the wire form sent to the backends
pub fn to_iso_string(value: &DateTime<FixedOffset>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Local date of an instant, `YYYY-MM-DD`
pub fn date_from_iso<Tz: TimeZone>(tz: &Tz, value: &DateTime<FixedOffset>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    value.with_timezone(tz).format("%Y-%m-%d").to_string()
}

/// Local time of an instant, `HH:mm`
pub fn time_from_iso<Tz: TimeZone>(tz: &Tz, value: &DateTime<FixedOffset>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    value.with_timezone(tz).format("%H:%M").to_string()
}

/// Serde helper writing optional timestamps with [`to_iso_string`]
pub(crate) mod iso_offset {
    use chrono::{DateTime, FixedOffset};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<FixedOffset>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&super::to_iso_string(dt)),
            None => serializer.serialize_none(),
        }
    }
}

pub(crate) fn local_date<Tz: TimeZone>(tz: &Tz, value: &DateTime<FixedOffset>) -> NaiveDate {
    value.with_timezone(tz).date_naive()
}

pub(crate) fn local_time<Tz: TimeZone>(tz: &Tz, value: &DateTime<FixedOffset>) -> NaiveTime {
    value.with_timezone(tz).time()
}
