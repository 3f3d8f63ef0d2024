//! Shift- and maintenance-aware calendar arithmetic.
//!
//! Pure, stateless functions over an instant, a work center, and a timezone.
//! All calculations happen in the configured timezone; inputs and outputs
//! crossing this boundary are UTC instants. Off-shift and maintenance time is
//! pure pass-through: only minutes inside a shift and outside every
//! maintenance window count toward an order's duration.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::api::{MaintenanceWindow, WorkCenter};
use crate::models::time::{merged_shift_spans, shift_spans_on};
use crate::scheduler::error::{ScheduleError, ScheduleResult};

/// Probe horizon for locating the next valid start, in days.
pub const SLOT_SEARCH_HORIZON_DAYS: i64 = 30;

/// Total horizon for walking a duration across shifts, in days.
pub const DURATION_WALK_HORIZON_DAYS: i64 = 365;

/// A maximal contiguous interval `[start, end)` where work can occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkableSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Whole minutes between `start` and `end`.
    pub minutes: i64,
}

/// True iff `t` falls inside some shift of the work center on its local
/// day-of-week and outside every maintenance window.
pub fn is_within_working_hours(t: DateTime<Utc>, wc: &WorkCenter, tz: Tz) -> bool {
    if wc.maintenance_windows.iter().any(|w| w.contains(t)) {
        return false;
    }
    let local_date = t.with_timezone(&tz).date_naive();
    // A wrap-around shift starting yesterday can still cover `t`.
    for offset in [-1i64, 0] {
        let date = local_date + Duration::days(offset);
        if shift_spans_on(date, &wc.shifts, tz)
            .iter()
            .any(|span| span.contains(t))
        {
            return true;
        }
    }
    false
}

/// The smallest instant `>= from` that is inside a shift and outside every
/// maintenance window.
///
/// If `from` is already valid it is returned unchanged; otherwise candidate
/// shift spans are probed in chronological order across at most
/// [`SLOT_SEARCH_HORIZON_DAYS`] days, each clipped against maintenance, and
/// the first non-empty portion's start wins.
pub fn find_earliest_valid_start(
    from: DateTime<Utc>,
    wc: &WorkCenter,
    tz: Tz,
) -> ScheduleResult<DateTime<Utc>> {
    if is_within_working_hours(from, wc, tz) {
        return Ok(from);
    }

    let windows = sorted_windows(wc);
    let local_date = from.with_timezone(&tz).date_naive();

    // Start one day back so a wrap-around shift already in progress is seen.
    for offset in -1..=SLOT_SEARCH_HORIZON_DAYS {
        let date = local_date + Duration::days(offset);
        for span in shift_spans_on(date, &wc.shifts, tz) {
            if span.end <= from {
                continue;
            }
            let candidate = (span.start.max(from), span.end);
            if let Some((start, _)) = subtract_maintenance_windows(candidate, &windows) {
                return Ok(start);
            }
        }
    }

    Err(ScheduleError::NoWorkableSlot {
        work_center_id: wc.id.value().to_string(),
        from,
        horizon_days: SLOT_SEARCH_HORIZON_DAYS,
    })
}

/// The next maximal contiguous slot where work can occur, at or after `from`.
///
/// The slot starts at [`find_earliest_valid_start`]; it ends at the earliest
/// of the containing shift union's end or the start of the first maintenance
/// window strictly after the slot start.
pub fn find_next_workable_slot(
    from: DateTime<Utc>,
    wc: &WorkCenter,
    tz: Tz,
) -> ScheduleResult<WorkableSlot> {
    let start = find_earliest_valid_start(from, wc, tz)?;

    // Touching shifts are merged, so the containing span is the full
    // contiguous run of working time around `start`.
    let local_date = start.with_timezone(&tz).date_naive();
    let merged = merged_shift_spans(local_date - Duration::days(1), 3, &wc.shifts, tz);
    let Some(containing) = merged.iter().find(|span| span.contains(start)) else {
        // Unreachable: a valid start is always inside some span.
        return Err(ScheduleError::NoWorkableSlot {
            work_center_id: wc.id.value().to_string(),
            from,
            horizon_days: SLOT_SEARCH_HORIZON_DAYS,
        });
    };

    let next_maintenance = sorted_windows(wc)
        .iter()
        .map(|w| w.start)
        .find(|&ws| ws > start);

    let end = match next_maintenance {
        Some(ws) if ws < containing.end => ws,
        _ => containing.end,
    };

    Ok(WorkableSlot {
        start,
        end,
        minutes: (end - start).num_minutes(),
    })
}

/// Advance `start` by `duration_minutes` working minutes, skipping off-shift
/// time and maintenance windows.
///
/// A zero duration returns `start` unchanged. Fails with
/// [`ScheduleError::NoWorkableSlot`] once the walk moves more than
/// [`DURATION_WALK_HORIZON_DAYS`] days past the original `start`.
pub fn calculate_end_date_with_shifts(
    start: DateTime<Utc>,
    duration_minutes: i64,
    wc: &WorkCenter,
    tz: Tz,
) -> ScheduleResult<DateTime<Utc>> {
    if duration_minutes <= 0 {
        return Ok(start);
    }

    let horizon = start + Duration::days(DURATION_WALK_HORIZON_DAYS);
    let mut remaining = duration_minutes;
    let mut cursor = start;

    loop {
        if cursor > horizon {
            return Err(ScheduleError::NoWorkableSlot {
                work_center_id: wc.id.value().to_string(),
                from: start,
                horizon_days: DURATION_WALK_HORIZON_DAYS,
            });
        }
        let slot = find_next_workable_slot(cursor, wc, tz)?;
        if slot.minutes >= remaining {
            return Ok(slot.start + Duration::minutes(remaining));
        }
        remaining -= slot.minutes;
        cursor = slot.end;
    }
}

/// Clip `[a, b)` by each maintenance window in chronological order and return
/// the first non-empty portion, or `None` when the windows cover it entirely.
///
/// A window covering the whole span yields `None`; one clipping the left
/// advances the start; one clipping the right, or lying strictly inside,
/// truncates the span at the window start (keeping only the left portion).
pub fn subtract_maintenance_windows(
    span: (DateTime<Utc>, DateTime<Utc>),
    windows: &[&MaintenanceWindow],
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let (mut a, mut b) = span;

    for w in windows {
        if w.end <= a || w.start >= b {
            continue;
        }
        if w.start <= a && w.end >= b {
            return None;
        }
        if w.start <= a {
            a = w.end;
        } else {
            b = w.start;
        }
        if a >= b {
            return None;
        }
    }

    (a < b).then_some((a, b))
}

/// Maintenance windows sorted by start, with degenerate (empty) windows
/// dropped.
fn sorted_windows(wc: &WorkCenter) -> Vec<&MaintenanceWindow> {
    let mut windows: Vec<&MaintenanceWindow> = wc
        .maintenance_windows
        .iter()
        .filter(|w| w.start < w.end)
        .collect();
    windows.sort_by_key(|w| (w.start, w.end));
    windows
}
