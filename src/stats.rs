use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::config::DeadlineConfig;
use crate::models::Tender;

/// Deadline counts shown in the summary box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderStats {
    /// Open tenders due within `urgent_days`.
    pub urgent_tenders: usize,
    pub total_notices: usize,
    /// Open tenders due within `critical_days`.
    pub upcoming_deadlines: usize,
}

/// Count tenders whose deadline is still ahead of `now` and falls inside the
/// configured windows. Unparseable deadlines only count towards the total.
pub fn compute_stats(tenders: &[Tender], now: DateTime<Utc>, windows: &DeadlineConfig) -> TenderStats {
    let urgent_until = window_end(now, windows.urgent_days);
    let critical_until = window_end(now, windows.critical_days);

    let mut stats = TenderStats {
        urgent_tenders: 0,
        total_notices: tenders.len(),
        upcoming_deadlines: 0,
    };

    for deadline in tenders.iter().filter_map(|t| parse_deadline(&t.deadline)) {
        if deadline <= now {
            continue;
        }
        if urgent_until.contains(deadline) {
            stats.urgent_tenders += 1;
        }
        if critical_until.contains(deadline) {
            stats.upcoming_deadlines += 1;
        }
    }

    stats
}

/// Upper bound of a deadline window. Windows too wide for the calendar
/// saturate instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowEnd {
    At(DateTime<Utc>),
    Unbounded,
    Empty,
}

impl WindowEnd {
    fn contains(self, deadline: DateTime<Utc>) -> bool {
        match self {
            WindowEnd::At(end) => deadline <= end,
            WindowEnd::Unbounded => true,
            WindowEnd::Empty => false,
        }
    }
}

fn window_end(now: DateTime<Utc>, days: i64) -> WindowEnd {
    match Duration::try_days(days).and_then(|span| now.checked_add_signed(span)) {
        Some(end) => WindowEnd::At(end),
        None if days > 0 => WindowEnd::Unbounded,
        None => WindowEnd::Empty,
    }
}

/// Parse an ISO-8601 deadline.
///
/// Accepts RFC 3339 timestamps, timestamps without an offset (taken as UTC)
/// and plain dates (midnight UTC).
pub fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
