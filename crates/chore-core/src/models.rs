use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::CoreError;

pub const MIN_DISGUST_LEVEL: u8 = 1;
pub const MAX_DISGUST_LEVEL: u8 = 5;

/// Cadence of a recurring chore.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
}

impl RecurrenceType {
    pub const ALL: [RecurrenceType; 4] = [
        RecurrenceType::Daily,
        RecurrenceType::Weekly,
        RecurrenceType::Biweekly,
        RecurrenceType::Monthly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceType::Daily => "daily",
            RecurrenceType::Weekly => "weekly",
            RecurrenceType::Biweekly => "biweekly",
            RecurrenceType::Monthly => "monthly",
        }
    }

    /// Human readable label shown next to a task.
    pub fn label(&self) -> &'static str {
        match self {
            RecurrenceType::Daily => "Every day",
            RecurrenceType::Weekly => "Once a week",
            RecurrenceType::Biweekly => "Every two weeks",
            RecurrenceType::Monthly => "Once a month",
        }
    }
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence type: {0}")]
pub struct ParseRecurrenceTypeError(pub String);

impl FromStr for RecurrenceType {
    type Err = ParseRecurrenceTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(RecurrenceType::Daily),
            "weekly" => Ok(RecurrenceType::Weekly),
            "biweekly" => Ok(RecurrenceType::Biweekly),
            "monthly" => Ok(RecurrenceType::Monthly),
            _ => Err(ParseRecurrenceTypeError(s.to_string())),
        }
    }
}

fn default_interval() -> u32 {
    1
}

/// How often a chore repeats: a cadence and a positive interval.
///
/// Serialized as `{ "type": "weekly", "interval": 2 }`; a missing interval
/// means 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawRecurrenceRule")]
pub struct RecurrenceRule {
    #[serde(rename = "type")]
    pub kind: RecurrenceType,
    pub interval: u32,
}

/// Unchecked wire form of [`RecurrenceRule`].
#[derive(Deserialize)]
struct RawRecurrenceRule {
    #[serde(rename = "type")]
    kind: RecurrenceType,
    #[serde(default = "default_interval")]
    interval: u32,
}

impl TryFrom<RawRecurrenceRule> for RecurrenceRule {
    type Error = CoreError;

    fn try_from(raw: RawRecurrenceRule) -> Result<Self, Self::Error> {
        Self::new(raw.kind, raw.interval)
    }
}

impl RecurrenceRule {
    pub fn new(kind: RecurrenceType, interval: u32) -> Result<Self, CoreError> {
        if interval == 0 {
            return Err(CoreError::InvalidRecurrenceInterval(0));
        }
        Ok(Self { kind, interval })
    }

    /// Builds a rule from an untyped tag and interval, e.g. a stored row.
    pub fn parse(tag: &str, interval: i64) -> Result<Self, CoreError> {
        let kind: RecurrenceType = tag.parse()?;
        let interval = u32::try_from(interval)
            .ok()
            .filter(|i| *i >= 1)
            .ok_or(CoreError::InvalidRecurrenceInterval(interval))?;
        Ok(Self { kind, interval })
    }

    pub fn every(kind: RecurrenceType) -> Self {
        Self { kind, interval: 1 }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.interval == 1 {
            write!(f, "{}", self.kind.label())
        } else {
            write!(f, "{} (x{})", self.kind.label(), self.interval)
        }
    }
}

/// A finished instance of a chore. Never modified after it is written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct CompletionRecord {
    pub id: String,
    pub task_id: String,
    pub completed_at: DateTime<Utc>,
    pub completed_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub duration_minutes: u32,
    pub disgust_level: u8,
    pub recurrence: RecurrenceRule,
    pub next_due_date: DateTime<Utc>,
    pub cleaning_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    /// Oldest first.
    #[serde(default)]
    pub completions: Vec<CompletionRecord>,
}

impl Task {
    pub fn last_completion(&self) -> Option<&CompletionRecord> {
        self.completions.last()
    }
}

/// Display grouping of a task relative to the current calendar day.
///
/// Ordering follows display order, so a `BTreeMap<Bucket, _>` iterates
/// Overdue first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Overdue,
    Today,
    Tomorrow,
    Later,
}

impl Bucket {
    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Overdue => "Overdue",
            Bucket::Today => "Today",
            Bucket::Tomorrow => "Tomorrow",
            Bucket::Later => "Later",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which date the next due date is computed from when a task is completed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompletionAnchor {
    /// The moment the task was completed. Late completions push the schedule back.
    #[default]
    Now,
    /// The task's previous due date, keeping the schedule fixed.
    #[serde(rename = "due", alias = "due_date")]
    DueDate,
}

impl fmt::Display for CompletionAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionAnchor::Now => write!(f, "now"),
            CompletionAnchor::DueDate => write!(f, "due"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid completion anchor: {0}")]
pub struct ParseCompletionAnchorError(String);

impl FromStr for CompletionAnchor {
    type Err = ParseCompletionAnchorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "now" => Ok(CompletionAnchor::Now),
            "due" | "due_date" => Ok(CompletionAnchor::DueDate),
            _ => Err(ParseCompletionAnchorError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTaskData {
    pub name: String,
    pub duration_minutes: u32,
    pub disgust_level: u8,
    pub recurrence: RecurrenceRule,
    /// Defaults to the creation time.
    pub next_due_date: Option<DateTime<Utc>>,
    pub cleaning_instructions: Option<String>,
}

impl Default for NewTaskData {
    fn default() -> Self {
        Self {
            name: String::new(),
            duration_minutes: 1,
            disgust_level: MIN_DISGUST_LEVEL,
            recurrence: RecurrenceRule::every(RecurrenceType::Weekly),
            next_due_date: None,
            cleaning_instructions: None,
        }
    }
}

impl NewTaskData {
    /// Checks field constraints. Called by the store before every insert.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name(&self.name)?;
        validate_duration(self.duration_minutes)?;
        validate_disgust_level(self.disgust_level)?;
        validate_interval(self.recurrence.interval)
    }
}

/// Partial update. `None` leaves a field untouched; for instructions,
/// `Some(None)` clears them.
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskData {
    pub name: Option<String>,
    pub duration_minutes: Option<u32>,
    pub disgust_level: Option<u8>,
    pub recurrence: Option<RecurrenceRule>,
    pub next_due_date: Option<DateTime<Utc>>,
    pub cleaning_instructions: Option<Option<String>>,
}

impl UpdateTaskData {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.duration_minutes.is_none()
            && self.disgust_level.is_none()
            && self.recurrence.is_none()
            && self.next_due_date.is_none()
            && self.cleaning_instructions.is_none()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(duration) = self.duration_minutes {
            validate_duration(duration)?;
        }
        if let Some(level) = self.disgust_level {
            validate_disgust_level(level)?;
        }
        if let Some(rule) = &self.recurrence {
            validate_interval(rule.interval)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::InvalidInput("Task name cannot be empty".to_string()));
    }
    Ok(())
}

fn validate_duration(minutes: u32) -> Result<(), CoreError> {
    if minutes < 1 {
        return Err(CoreError::InvalidInput(
            "Duration must be at least 1 minute".to_string(),
        ));
    }
    Ok(())
}

fn validate_disgust_level(level: u8) -> Result<(), CoreError> {
    if !(MIN_DISGUST_LEVEL..=MAX_DISGUST_LEVEL).contains(&level) {
        return Err(CoreError::InvalidInput(format!(
            "Disgust level must be between {} and {}, got {}",
            MIN_DISGUST_LEVEL, MAX_DISGUST_LEVEL, level
        )));
    }
    Ok(())
}

fn validate_interval(interval: u32) -> Result<(), CoreError> {
    if interval < 1 {
        return Err(CoreError::InvalidRecurrenceInterval(interval as i64));
    }
    Ok(())
}

/// Outcome of completing a task.
#[derive(Debug)]
pub struct CompletionResult {
    pub completion: CompletionRecord,
    /// The task with its advanced due date.
    pub task: Task,
    pub previous_due_date: DateTime<Utc>,
}

// ============================================================================
// Wire form
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurrenceRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
}

/// Loosely typed JSON shape of a task, as written by `chore export`.
///
/// Nothing in a record is trusted: timestamps and recurrence tags are parsed
/// when the record is classified or converted into a [`Task`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskRecord {
    pub id: String,
    pub name: String,
    pub duration_minutes: i64,
    pub disgust_level: i64,
    pub recurrence: RecurrenceRecord,
    pub next_due_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleaning_instructions: Option<String>,
    #[serde(default)]
    pub completions: Vec<CompletionRecord>,
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, CoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| CoreError::InvalidTimestamp(value.to_string()))
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            duration_minutes: task.duration_minutes as i64,
            disgust_level: task.disgust_level as i64,
            recurrence: RecurrenceRecord {
                kind: task.recurrence.kind.to_string(),
                interval: Some(task.recurrence.interval as i64),
            },
            next_due_date: task.next_due_date.to_rfc3339(),
            cleaning_instructions: task.cleaning_instructions.clone(),
            completions: task.completions.clone(),
        }
    }
}

impl TryFrom<&TaskRecord> for Task {
    type Error = CoreError;

    fn try_from(record: &TaskRecord) -> Result<Self, Self::Error> {
        let recurrence =
            RecurrenceRule::parse(&record.recurrence.kind, record.recurrence.interval.unwrap_or(1))?;
        let duration_minutes = u32::try_from(record.duration_minutes).map_err(|_| {
            CoreError::InvalidInput(format!("Invalid duration: {}", record.duration_minutes))
        })?;
        let disgust_level = u8::try_from(record.disgust_level).map_err(|_| {
            CoreError::InvalidInput(format!("Invalid disgust level: {}", record.disgust_level))
        })?;
        validate_name(&record.name)?;
        validate_duration(duration_minutes)?;
        validate_disgust_level(disgust_level)?;

        let next_due_date = parse_timestamp(&record.next_due_date)?;
        let mut completions = record.completions.clone();
        completions.sort_by_key(|c| c.completed_at);

        Ok(Task {
            id: record.id.clone(),
            name: record.name.clone(),
            duration_minutes,
            disgust_level,
            recurrence,
            next_due_date,
            cleaning_instructions: record.cleaning_instructions.clone(),
            created_at: next_due_date,
            updated_at: next_due_date,
            created_by: None,
            completions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("daily", RecurrenceType::Daily)]
    #[case("Weekly", RecurrenceType::Weekly)]
    #[case(" biweekly ", RecurrenceType::Biweekly)]
    #[case("MONTHLY", RecurrenceType::Monthly)]
    fn test_recurrence_type_from_str(#[case] input: &str, #[case] expected: RecurrenceType) {
        assert_eq!(input.parse::<RecurrenceType>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_recurrence_type_is_an_error() {
        let err = RecurrenceRule::parse("yearly", 1).unwrap_err();
        assert!(matches!(err, CoreError::InvalidRecurrenceType(ref tag) if tag == "yearly"));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        assert!(matches!(
            RecurrenceRule::parse("daily", 0),
            Err(CoreError::InvalidRecurrenceInterval(0))
        ));
        assert!(matches!(
            RecurrenceRule::new(RecurrenceType::Weekly, 0),
            Err(CoreError::InvalidRecurrenceInterval(0))
        ));
    }

    #[test]
    fn test_rule_json_shape() {
        let rule: RecurrenceRule = serde_json::from_str(r#"{"type":"biweekly"}"#).unwrap();
        assert_eq!(rule, RecurrenceRule::every(RecurrenceType::Biweekly));

        let json = serde_json::to_string(&RecurrenceRule::new(RecurrenceType::Monthly, 3).unwrap()).unwrap();
        assert_eq!(json, r#"{"type":"monthly","interval":3}"#);

        assert!(serde_json::from_str::<RecurrenceRule>(r#"{"type":"yearly","interval":1}"#).is_err());

        let err = serde_json::from_str::<RecurrenceRule>(r#"{"type":"daily","interval":0}"#).unwrap_err();
        assert!(err.to_string().contains("must be at least 1"), "got {err}");
    }

    #[test]
    fn test_bucket_order_is_display_order() {
        let mut buckets = vec![Bucket::Later, Bucket::Today, Bucket::Overdue, Bucket::Tomorrow];
        buckets.sort();
        assert_eq!(
            buckets,
            vec![Bucket::Overdue, Bucket::Today, Bucket::Tomorrow, Bucket::Later]
        );
    }

    #[test]
    fn test_completion_anchor_parsing() {
        assert_eq!("now".parse::<CompletionAnchor>().unwrap(), CompletionAnchor::Now);
        assert_eq!("due".parse::<CompletionAnchor>().unwrap(), CompletionAnchor::DueDate);
        assert!("later".parse::<CompletionAnchor>().is_err());
        assert_eq!(CompletionAnchor::default(), CompletionAnchor::Now);
    }

    #[rstest]
    #[case("", 10, 3)]
    #[case("   ", 10, 3)]
    #[case("Dishes", 0, 3)]
    #[case("Dishes", 10, 0)]
    #[case("Dishes", 10, 6)]
    fn test_new_task_validation_rejects(
        #[case] name: &str,
        #[case] duration: u32,
        #[case] disgust: u8,
    ) {
        let data = NewTaskData {
            name: name.to_string(),
            duration_minutes: duration,
            disgust_level: disgust,
            ..Default::default()
        };
        assert!(matches!(data.validate(), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_new_task_validation_accepts_bounds() {
        for level in MIN_DISGUST_LEVEL..=MAX_DISGUST_LEVEL {
            let data = NewTaskData {
                name: "Scrub tub".to_string(),
                duration_minutes: 1,
                disgust_level: level,
                ..Default::default()
            };
            assert!(data.validate().is_ok());
        }
    }

    #[test]
    fn test_update_validation() {
        assert!(UpdateTaskData::default().validate().is_ok());
        assert!(UpdateTaskData::default().is_empty());

        let update = UpdateTaskData {
            disgust_level: Some(9),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        assert!(!update.is_empty());
    }

    #[test]
    fn test_record_with_unknown_tag_does_not_convert() {
        let record = TaskRecord {
            id: "abc".to_string(),
            name: "Windows".to_string(),
            duration_minutes: 30,
            disgust_level: 2,
            recurrence: RecurrenceRecord {
                kind: "yearly".to_string(),
                interval: None,
            },
            next_due_date: "2024-05-01T10:00:00Z".to_string(),
            cleaning_instructions: None,
            completions: vec![],
        };
        assert!(matches!(
            Task::try_from(&record),
            Err(CoreError::InvalidRecurrenceType(_))
        ));
    }

    #[test]
    fn test_record_roundtrip_keeps_schedule() {
        let record = TaskRecord {
            id: "abc".to_string(),
            name: "Windows".to_string(),
            duration_minutes: 30,
            disgust_level: 2,
            recurrence: RecurrenceRecord {
                kind: "monthly".to_string(),
                interval: None,
            },
            next_due_date: "2024-05-01T12:00:00+02:00".to_string(),
            cleaning_instructions: Some("Vinegar".to_string()),
            completions: vec![],
        };
        let task = Task::try_from(&record).unwrap();
        assert_eq!(task.recurrence, RecurrenceRule::every(RecurrenceType::Monthly));
        assert_eq!(task.next_due_date.to_rfc3339(), "2024-05-01T10:00:00+00:00");

        let back = TaskRecord::from(&task);
        assert_eq!(back.recurrence.interval, Some(1));
        assert_eq!(back.cleaning_instructions.as_deref(), Some("Vinegar"));
    }
}
