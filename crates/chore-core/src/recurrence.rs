use chrono::{DateTime, Duration, LocalResult, Months, NaiveDateTime, TimeZone};
use tracing::debug;

use crate::error::CoreError;
use crate::models::{CompletionAnchor, RecurrenceRule, RecurrenceType, Task};

/// Computes the next due date of a rule relative to `from`.
///
/// # Arguments
/// * `rule` - The recurrence rule (cadence and interval)
/// * `from` - Reference timestamp the interval is added to. Its timezone is
///   the calendar the arithmetic runs on.
///
/// # Returns
/// * `Result<DateTime<Z>, CoreError>` - The next due date or error
///
/// # Behavior
/// - Daily, weekly and biweekly rules add exactly `interval`, `7 * interval`
///   and `14 * interval` calendar days
/// - Monthly rules add calendar months and keep the day of month; when the
///   resulting month is shorter the date is clamped to its last day
///   (Jan 31 + 1 month = Feb 29 in a leap year)
/// - Local time of day is preserved across DST changes. A time that falls in
///   a DST gap moves forward by an hour; an ambiguous time takes the earlier
///   instant.
/// - A zero interval fails with `InvalidRecurrenceInterval`
pub fn next_due_date<Z: TimeZone>(rule: &RecurrenceRule, from: DateTime<Z>) -> Result<DateTime<Z>, CoreError> {
    if rule.interval == 0 {
        return Err(CoreError::InvalidRecurrenceInterval(0));
    }
    let interval = rule.interval as i64;
    let local = from.naive_local();

    let naive = match rule.kind {
        RecurrenceType::Daily => add_days(local, interval),
        RecurrenceType::Weekly => add_days(local, 7 * interval),
        RecurrenceType::Biweekly => add_days(local, 14 * interval),
        RecurrenceType::Monthly => local.checked_add_months(Months::new(rule.interval)),
    }
    .ok_or(CoreError::DateOutOfRange)?;

    let next = resolve_local(&from.timezone(), naive).ok_or(CoreError::DateOutOfRange)?;

    debug!(rule = %rule.kind, interval = rule.interval, from = ?from, next = ?next, "computed next due date");
    Ok(next)
}

#[inline]
fn add_days(from: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    Duration::try_days(days).and_then(|d| from.checked_add_signed(d))
}

/// Maps a wall-clock time back to an instant in `tz`.
fn resolve_local<Z: TimeZone>(tz: &Z, naive: NaiveDateTime) -> Option<DateTime<Z>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            let shifted = naive.checked_add_signed(Duration::hours(1))?;
            tz.from_local_datetime(&shifted).earliest()
        }
    }
}

/// Same as [`next_due_date`] for an untyped tag, e.g. a value read from a form.
pub fn next_due_date_for_tag<Z: TimeZone>(
    tag: &str,
    interval: i64,
    from: DateTime<Z>,
) -> Result<DateTime<Z>, CoreError> {
    let rule = RecurrenceRule::parse(tag, interval)?;
    next_due_date(&rule, from)
}

/// Reference date used to reschedule `task` when it is completed at `now`,
/// expressed in the timezone of `now`.
pub fn anchor_for<Z: TimeZone>(anchor: CompletionAnchor, task: &Task, now: DateTime<Z>) -> DateTime<Z> {
    match anchor {
        CompletionAnchor::Now => now,
        CompletionAnchor::DueDate => task.next_due_date.with_timezone(&now.timezone()),
    }
}

/// The next `count` due dates after `from`, each computed from the previous one.
pub fn preview<Z: TimeZone>(
    rule: &RecurrenceRule,
    from: DateTime<Z>,
    count: usize,
) -> Result<Vec<DateTime<Z>>, CoreError> {
    let mut dates = Vec::with_capacity(count);
    let mut current = from;
    for _ in 0..count {
        current = next_due_date(rule, current)?;
        dates.push(current.clone());
    }
    Ok(dates)
}
