use crate::error::CoreError;
use crate::models::{CompletionRecord, NewTaskData, Task, UpdateTaskData};
use crate::repository::{SqliteRepository, TaskRow};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use std::collections::HashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[async_trait]
impl super::TaskRepository for SqliteRepository {
    async fn load_tasks(&self) -> Result<Vec<Task>, CoreError> {
        let rows: Vec<TaskRow> =
            sqlx::query_as("SELECT * FROM tasks ORDER BY next_due_date ASC, created_at ASC")
                .fetch_all(self.pool())
                .await?;

        let completions: Vec<CompletionRecord> =
            sqlx::query_as("SELECT * FROM task_completions ORDER BY completed_at ASC")
                .fetch_all(self.pool())
                .await?;

        let mut by_task: HashMap<String, Vec<CompletionRecord>> = HashMap::with_capacity(rows.len());
        for completion in completions {
            by_task.entry(completion.task_id.clone()).or_default().push(completion);
        }

        debug!(count = rows.len(), "loaded tasks");
        rows.into_iter()
            .map(|row| {
                let completions = by_task.remove(&row.id).unwrap_or_default();
                row.into_task(completions)
            })
            .collect()
    }

    async fn find_task_by_id(&self, id: &str) -> Result<Option<Task>, CoreError> {
        let mut conn = self.pool().acquire().await?;
        Self::find_task_in_connection(&mut *conn, id).await
    }

    async fn find_tasks_by_id_prefix(&self, prefix: &str) -> Result<Vec<Task>, CoreError> {
        let mut pattern = String::with_capacity(prefix.len() + 1);
        for c in prefix.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');

        let rows: Vec<TaskRow> = sqlx::query_as(r"SELECT * FROM tasks WHERE id LIKE ? ESCAPE '\' ORDER BY id")
            .bind(pattern)
            .fetch_all(self.pool())
            .await?;

        // Completions are not needed to resolve an ID.
        rows.into_iter().map(|row| row.into_task(Vec::new())).collect()
    }

    async fn create_task(&self, data: NewTaskData, created_by: Option<&str>) -> Result<Task, CoreError> {
        if let Err(e) = data.validate() {
            warn!(error = %e, "rejected new task");
            return Err(e);
        }

        let now = Utc::now();
        let row: TaskRow = sqlx::query_as(
            r#"INSERT INTO tasks (
                id, name, duration_minutes, disgust_level, recurrence_type, recurrence_interval,
                next_due_date, cleaning_instructions, created_at, updated_at, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9, $10)
            RETURNING *"#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(data.name.trim())
        .bind(data.duration_minutes as i64)
        .bind(data.disgust_level as i64)
        .bind(data.recurrence.kind.as_str())
        .bind(data.recurrence.interval as i64)
        .bind(data.next_due_date.unwrap_or(now))
        .bind(normalize_instructions(data.cleaning_instructions))
        .bind(now)
        .bind(created_by)
        .fetch_one(self.pool())
        .await?;

        let task = row.into_task(Vec::new())?;
        info!(id = %task.id, name = %task.name, due = %task.next_due_date, "created task");
        Ok(task)
    }

    async fn update_task(&self, id: &str, data: UpdateTaskData) -> Result<Task, CoreError> {
        if let Err(e) = data.validate() {
            warn!(id, error = %e, "rejected task update");
            return Err(e);
        }

        let mut tx = self.pool().begin().await?;

        if !data.is_empty() {
            Self::update_task_fields(&mut *tx, id, &data).await?;
        }

        let task = Self::find_task_in_connection(&mut *tx, id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        tx.commit().await?;
        debug!(id, "updated task");
        Ok(task)
    }

    async fn delete_task(&self, id: &str) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        info!(id, "deleted task");
        Ok(())
    }
}

impl SqliteRepository {
    /// Loads one task with its completions on an existing connection or transaction.
    pub(crate) async fn find_task_in_connection(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<Task>, CoreError> {
        let row: Option<TaskRow> = sqlx::query_as("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let completions: Vec<CompletionRecord> = sqlx::query_as(
            "SELECT * FROM task_completions WHERE task_id = $1 ORDER BY completed_at ASC",
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

        row.into_task(completions).map(Some)
    }

    /// Writes the fields present in `data`. Fails with `NotFound` if no row matches.
    pub(crate) async fn update_task_fields(
        conn: &mut SqliteConnection,
        id: &str,
        data: &UpdateTaskData,
    ) -> Result<(), CoreError> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE tasks SET ");
        {
            let mut fields = qb.separated(", ");

            if let Some(name) = &data.name {
                fields.push("name = ");
                fields.push_bind_unseparated(name.trim().to_string());
            }
            if let Some(duration) = data.duration_minutes {
                fields.push("duration_minutes = ");
                fields.push_bind_unseparated(duration as i64);
            }
            if let Some(level) = data.disgust_level {
                fields.push("disgust_level = ");
                fields.push_bind_unseparated(level as i64);
            }
            if let Some(rule) = &data.recurrence {
                fields.push("recurrence_type = ");
                fields.push_bind_unseparated(rule.kind.as_str());
                fields.push("recurrence_interval = ");
                fields.push_bind_unseparated(rule.interval as i64);
            }
            if let Some(due) = data.next_due_date {
                fields.push("next_due_date = ");
                fields.push_bind_unseparated(due);
            }
            if let Some(instructions) = &data.cleaning_instructions {
                fields.push("cleaning_instructions = ");
                fields.push_bind_unseparated(normalize_instructions(instructions.clone()));
            }
            fields.push("updated_at = ");
            fields.push_bind_unseparated(Utc::now());
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);

        let result = qb.build().execute(&mut *conn).await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Blank instructions are stored as NULL.
fn normalize_instructions(instructions: Option<String>) -> Option<String> {
    instructions
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
