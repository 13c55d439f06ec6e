use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chore_core::classify::classify;
use chore_core::models::{Bucket, Task, TaskRecord};
use chore_core::repository::{Repository, TaskRepository};
use chore_core::timezone::now_in;
use serde::Serialize;

use crate::cli::ListCommand;
use crate::config::Config;
use crate::views::table::display_buckets;

pub async fn list_tasks(repo: &impl Repository, command: ListCommand, config: &Config) -> Result<()> {
    let tz = config.tz()?;
    let now = now_in(tz);

    let tasks = match command.input.as_deref() {
        // Every record is validated before anything is printed.
        Some(path) => read_records(path)
            .await?
            .iter()
            .map(Task::try_from)
            .collect::<Result<Vec<_>, _>>()?,
        None => repo.load_tasks().await?,
    };

    let buckets = classify(&tasks, &now)?;
    if command.json {
        let records: BTreeMap<Bucket, Vec<TaskRecord>> = buckets
            .iter()
            .map(|(bucket, tasks)| (*bucket, tasks.iter().map(|t| TaskRecord::from(*t)).collect()))
            .collect();
        return print_json(&records);
    }

    display_buckets(&buckets, tz);
    Ok(())
}

async fn read_records(path: &Path) -> Result<Vec<TaskRecord>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON list of chores", path.display()))?;
    Ok(records)
}

fn print_json<T: Serialize>(buckets: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(buckets)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chore_core::classify::Buckets;
    use chore_core::models::RecurrenceRecord;
    use chrono::{TimeZone, Utc};

    fn record(id: &str, due: &str) -> TaskRecord {
        TaskRecord {
            id: id.to_string(),
            name: format!("Chore {id}"),
            duration_minutes: 10,
            disgust_level: 2,
            recurrence: RecurrenceRecord {
                kind: "weekly".to_string(),
                interval: None,
            },
            next_due_date: due.to_string(),
            cleaning_instructions: None,
            completions: vec![],
        }
    }

    #[test]
    fn test_bucket_json_shape() {
        let records = vec![
            record("a", "2024-05-09T10:00:00Z"),
            record("b", "2024-05-01T10:00:00Z"),
        ];
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        let buckets: Buckets<'_, TaskRecord> = classify(&records, &now).unwrap();

        let json: serde_json::Value = serde_json::to_value(&buckets).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert_eq!(json["Overdue"][0]["id"], "b");
        assert_eq!(json["Later"][0]["recurrence"]["type"], "weekly");
        assert!(json.get("Today").is_none());
    }

    #[tokio::test]
    async fn test_read_records_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chores.json");
        tokio::fs::write(&path, "{\"oops\": true}").await.unwrap();
        let err = read_records(&path).await.unwrap_err();
        assert!(err.to_string().contains("not a JSON list"));
    }
}
