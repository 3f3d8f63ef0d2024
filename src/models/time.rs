//! Calendar primitives: concrete shift spans and timezone resolution.
//!
//! Shift definitions are weekly wall-clock rules; everything downstream of
//! this module works on absolute UTC instants. The functions here resolve a
//! rule against a concrete local date, producing half-open `[start, end)`
//! spans in UTC, and merge overlapping or touching spans into maximal
//! contiguous intervals.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::api::ShiftDefinition;

/// A concrete half-open working interval `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ShiftSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ShiftSpan {
    /// Whether an instant falls inside this span.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }
}

/// Resolve a local wall time `date` at `hour`:00 to a UTC instant.
///
/// On a DST fall-back ambiguity the earlier instant wins; a boundary landing
/// in a spring-forward gap resolves to the first representable wall time one
/// hour later. Returns `None` only for unrepresentable dates.
pub fn local_hour_to_utc(date: NaiveDate, hour: u8, tz: Tz) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(u32::from(hour), 0, 0)?;
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match tz.from_local_datetime(&(naive + Duration::hours(1))) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                Some(dt.with_timezone(&Utc))
            }
            LocalResult::None => None,
        },
    }
}

/// Concrete spans of every shift that *starts* on the given local date.
///
/// A wrap-around shift (`end_hour < start_hour`) ends at `end_hour` on the
/// next calendar day, whether or not that day has shift definitions of its
/// own. `end_hour == start_hour` means zero minutes and is skipped.
pub fn shift_spans_on(date: NaiveDate, shifts: &[ShiftDefinition], tz: Tz) -> Vec<ShiftSpan> {
    let weekday = date.weekday().num_days_from_sunday();
    let mut spans = Vec::new();

    for shift in shifts {
        if u32::from(shift.day_of_week) != weekday || shift.end_hour == shift.start_hour {
            continue;
        }
        let end_date = if shift.end_hour < shift.start_hour {
            date + Duration::days(1)
        } else {
            date
        };
        let (Some(start), Some(end)) = (
            local_hour_to_utc(date, shift.start_hour, tz),
            local_hour_to_utc(end_date, shift.end_hour, tz),
        ) else {
            continue;
        };
        if start < end {
            spans.push(ShiftSpan { start, end });
        }
    }

    spans.sort();
    spans
}

/// All shift spans starting within `days` local dates of `from_date`
/// (inclusive), merged so that overlapping or touching spans become one
/// maximal contiguous interval.
pub fn merged_shift_spans(
    from_date: NaiveDate,
    days: i64,
    shifts: &[ShiftDefinition],
    tz: Tz,
) -> Vec<ShiftSpan> {
    let mut spans = Vec::new();
    for offset in 0..=days {
        spans.extend(shift_spans_on(from_date + Duration::days(offset), shifts, tz));
    }
    spans.sort();

    let mut merged: Vec<ShiftSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => {
                last.end = last.end.max(span.end);
            }
            _ => merged.push(span),
        }
    }
    merged
}
