//! Grouping of tasks into display buckets by calendar day.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::models::{parse_timestamp, Bucket, Task, TaskRecord};

/// Anything that has an identifier and a due timestamp.
pub trait Due {
    fn id(&self) -> &str;
    fn due_at(&self) -> Result<DateTime<Utc>, CoreError>;
}

impl Due for Task {
    fn id(&self) -> &str {
        &self.id
    }

    fn due_at(&self) -> Result<DateTime<Utc>, CoreError> {
        Ok(self.next_due_date)
    }
}

impl Due for TaskRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn due_at(&self) -> Result<DateTime<Utc>, CoreError> {
        parse_timestamp(&self.next_due_date)
    }
}

/// Buckets in display order. Empty buckets are absent.
pub type Buckets<'a, T> = BTreeMap<Bucket, Vec<&'a T>>;

/// Bucket of a due date seen from `today`.
pub fn bucket_for(due_day: NaiveDate, today: NaiveDate) -> Bucket {
    if due_day < today {
        Bucket::Overdue
    } else if due_day == today {
        Bucket::Today
    } else if today.checked_add_days(Days::new(1)) == Some(due_day) {
        Bucket::Tomorrow
    } else {
        Bucket::Later
    }
}

/// Partitions `tasks` into [`Bucket`]s relative to `now`.
///
/// Days are compared in `now`'s timezone, so a task due later today is
/// `Today` even if its instant is after `now`. Tasks keep their input order
/// inside a bucket. Buckets without tasks are not present in the result, and
/// an empty input gives an empty map.
///
/// Fails on the first task whose due date cannot be read.
pub fn classify<'a, T, Z>(tasks: &'a [T], now: &DateTime<Z>) -> Result<Buckets<'a, T>, CoreError>
where
    T: Due,
    Z: TimeZone,
{
    let tz = now.timezone();
    let today = now.date_naive();
    let mut buckets: Buckets<'a, T> = BTreeMap::new();

    for task in tasks {
        let due_day = task.due_at()?.with_timezone(&tz).date_naive();
        buckets
            .entry(bucket_for(due_day, today))
            .or_default()
            .push(task);
    }

    Ok(buckets)
}
