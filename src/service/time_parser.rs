use std::sync::LazyLock;

use chrono::{DateTime, Duration, LocalResult, NaiveTime, TimeZone, Utc};
use regex::Regex;

use crate::models::error::TimeParseError;
use crate::models::event::TimeSpan;

pub const RANGE_SEPARATOR: char = '–';
pub const DEFAULT_DURATION_HOURS: i64 = 3;

static RE_CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2}):(\d{2})\s?(am|pm)").expect("invalid regex: clock time")
});

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Finds the first `H:MM am/pm` in `text` and returns it as a 24-hour time.
pub fn parse_clock_time(text: &str) -> Result<NaiveTime, TimeParseError> {
    let normalized = collapse_whitespace(text);
    let caps = RE_CLOCK_TIME
        .captures(&normalized)
        .ok_or_else(|| TimeParseError::NoClockTime(normalized.clone()))?;

    let hour: u32 = caps[1]
        .parse()
        .map_err(|_| TimeParseError::NoClockTime(normalized.clone()))?;
    let minute: u32 = caps[2]
        .parse()
        .map_err(|_| TimeParseError::NoClockTime(normalized.clone()))?;
    if !(1..=12).contains(&hour) {
        return Err(TimeParseError::InvalidClock { hour, minute });
    }

    let is_pm = caps[3].eq_ignore_ascii_case("pm");
    let hour24 = match (is_pm, hour) {
        (true, 12) => 12,
        (true, h) => h + 12,
        (false, 12) => 0,
        (false, h) => h,
    };

    NaiveTime::from_hms_opt(hour24, minute, 0)
        .ok_or(TimeParseError::InvalidClock { hour, minute })
}

/// Puts `time` on the calendar date of `base`, in `base`'s own zone.
fn on_base_date<Tz: TimeZone>(
    base: &DateTime<Tz>,
    time: NaiveTime,
) -> Result<DateTime<Utc>, TimeParseError> {
    let naive = base.date_naive().and_time(time);
    match base.timezone().from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(TimeParseError::NonexistentLocalTime(naive.to_string())),
    }
}

fn parse_single<Tz: TimeZone>(
    text: &str,
    base: &DateTime<Tz>,
) -> Result<DateTime<Utc>, TimeParseError> {
    let time = parse_clock_time(text)?;
    on_base_date(base, time)
}

/// Parses `"7:00pm"` or `"7:00pm – 10:00pm"` against the date of `base`.
///
/// A single time gets a fixed three hour duration. For a range both sides are
/// parsed independently on the same date; a range crossing midnight therefore
/// ends before it starts.
pub fn parse_time_span<Tz: TimeZone>(
    time_text: &str,
    base: &DateTime<Tz>,
) -> Result<TimeSpan, TimeParseError> {
    if let Some((left, right)) = time_text.split_once(RANGE_SEPARATOR) {
        let start_time = parse_single(left.trim(), base)?;
        let end_time = parse_single(right.trim(), base)?;
        return Ok(TimeSpan {
            start_time,
            end_time,
        });
    }

    let start_time = parse_single(time_text, base)?;
    Ok(TimeSpan {
        start_time,
        end_time: start_time + Duration::hours(DEFAULT_DURATION_HOURS),
    })
}
