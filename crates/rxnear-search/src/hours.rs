//! Operating-hours schedule evaluation.
//!
//! Schedules are human-entered strings like
//! `"Mon-Fri: 8AM-10PM, Sat-Sun: 9AM-9PM"`: comma-separated clauses, each a
//! day selector and a time range separated by the first `:`. Evaluation is
//! pure — the caller supplies the weekday and time of day — and fail-safe:
//! anything unparseable reports closed.

use chrono::{NaiveTime, Weekday};

/// Decides whether a facility is open at the given instant.
///
/// Rules, in order:
/// - `is_24_hours` wins over any schedule string, including a malformed one.
/// - The FIRST clause whose day selector matches the weekday and whose time
///   range parses decides the answer; a matched clause with a malformed time
///   range is skipped.
/// - A close time numerically before the open time means the window crosses
///   midnight: open ⇔ `now >= open || now < close`.
/// - Otherwise open ⇔ `open < now < close`. Boundary instants report closed;
///   this matches the reference behavior and is covered by tests.
/// - No clause decides ⇒ closed.
#[must_use]
pub fn is_open_at(schedule: &str, is_24_hours: bool, weekday: Weekday, now: NaiveTime) -> bool {
    if is_24_hours {
        return true;
    }
    if schedule.trim().is_empty() {
        return false;
    }

    for clause in schedule.split(',') {
        let clause = clause.trim().to_lowercase();
        if !day_matches(&clause, weekday) {
            continue;
        }
        if let Some(open) = evaluate_clause(&clause, now) {
            return open;
        }
    }

    false
}

/// Day selectors: explicit 3-letter abbreviation, `mon-fri` for ISO weekdays
/// 1–5, `sat-sun` for 6–7. Substring matching on the lowercased clause.
fn day_matches(clause: &str, weekday: Weekday) -> bool {
    if clause.contains(day_abbrev(weekday)) {
        return true;
    }
    let iso = weekday.number_from_monday();
    (clause.contains("mon-fri") && iso <= 5) || (clause.contains("sat-sun") && iso >= 6)
}

fn day_abbrev(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

/// Evaluates one already-day-matched clause. `None` means the time range was
/// malformed and the clause should be skipped.
fn evaluate_clause(clause: &str, now: NaiveTime) -> Option<bool> {
    // Split on the FIRST ':' only; times like "10:30pm" keep their colon.
    let (_, time_range) = clause.split_once(':')?;
    let (open_str, close_str) = time_range.trim().split_once('-')?;

    let open = parse_time(open_str)?;
    let close = parse_time(close_str)?;

    if close < open {
        // Crosses midnight.
        Some(now >= open || now < close)
    } else {
        Some(open < now && now < close)
    }
}

/// Parses `8AM`, `10:30PM`, or 24-hour `H:mm`. Minutes default to 0 in the
/// 12-hour form; the 24-hour form requires them.
fn parse_time(raw: &str) -> Option<NaiveTime> {
    let cleaned = raw.trim().to_uppercase().replace(' ', "");

    let (digits, is_pm) = if let Some(rest) = cleaned.strip_suffix("PM") {
        (rest, Some(true))
    } else if let Some(rest) = cleaned.strip_suffix("AM") {
        (rest, Some(false))
    } else {
        (cleaned.as_str(), None)
    };

    match is_pm {
        Some(pm) => {
            let (hour_str, minute_str) = match digits.split_once(':') {
                Some((h, m)) => (h, m),
                None => (digits, "0"),
            };
            let mut hour: u32 = hour_str.parse().ok()?;
            let minute: u32 = minute_str.parse().ok()?;
            if pm && hour != 12 {
                hour += 12;
            } else if !pm && hour == 12 {
                hour = 0;
            }
            NaiveTime::from_hms_opt(hour, minute, 0)
        }
        None => {
            let (hour_str, minute_str) = digits.split_once(':')?;
            let hour: u32 = hour_str.parse().ok()?;
            let minute: u32 = minute_str.parse().ok()?;
            NaiveTime::from_hms_opt(hour, minute, 0)
        }
    }
}
