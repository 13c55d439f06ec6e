use crate::error::CoreError;
use crate::models::{CompletionAnchor, CompletionRecord, CompletionResult, UpdateTaskData};
use crate::recurrence::{anchor_for, next_due_date};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use sqlx::SqliteConnection;
use tracing::info;
use uuid::Uuid;

#[async_trait]
impl super::CompletionRepository for SqliteRepository {
    async fn record_completion(
        &self,
        task_id: &str,
        completed_by: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<CompletionRecord, CoreError> {
        let mut conn = self.pool().acquire().await?;
        Self::insert_completion(&mut *conn, task_id, completed_by, completed_at).await
    }

    async fn find_completions(&self, task_id: &str) -> Result<Vec<CompletionRecord>, CoreError> {
        let completions = sqlx::query_as(
            "SELECT * FROM task_completions WHERE task_id = $1 ORDER BY completed_at ASC",
        )
        .bind(task_id)
        .fetch_all(self.pool())
        .await?;
        Ok(completions)
    }

    async fn complete_task(
        &self,
        id: &str,
        completed_by: &str,
        now: DateTime<Tz>,
        anchor: CompletionAnchor,
    ) -> Result<CompletionResult, CoreError> {
        let mut tx = self.pool().begin().await?;

        let task = Self::find_task_in_connection(&mut *tx, id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        let completed_at = now.with_timezone(&Utc);
        let completion = Self::insert_completion(&mut *tx, id, completed_by, completed_at).await?;

        let reference = anchor_for(anchor, &task, now);
        let next = next_due_date(&task.recurrence, reference)?;

        let update = UpdateTaskData {
            next_due_date: Some(next.with_timezone(&Utc)),
            ..Default::default()
        };
        Self::update_task_fields(&mut *tx, id, &update).await?;

        let updated = Self::find_task_in_connection(&mut *tx, id)
            .await?
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        tx.commit().await?;

        info!(
            id,
            completed_by,
            %anchor,
            previous = %task.next_due_date,
            next = %updated.next_due_date,
            "completed task"
        );

        Ok(CompletionResult {
            completion,
            task: updated,
            previous_due_date: task.next_due_date,
        })
    }
}

impl SqliteRepository {
    async fn insert_completion(
        conn: &mut SqliteConnection,
        task_id: &str,
        completed_by: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<CompletionRecord, CoreError> {
        let exists: Option<(String,)> = sqlx::query_as("SELECT id FROM tasks WHERE id = $1")
            .bind(task_id)
            .fetch_optional(&mut *conn)
            .await?;
        if exists.is_none() {
            return Err(CoreError::NotFound(task_id.to_string()));
        }

        let completion = sqlx::query_as(
            r#"INSERT INTO task_completions (id, task_id, completed_at, completed_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *"#,
        )
        .bind(Uuid::now_v7().to_string())
        .bind(task_id)
        .bind(completed_at)
        .bind(completed_by)
        .fetch_one(&mut *conn)
        .await?;
        Ok(completion)
    }
}
