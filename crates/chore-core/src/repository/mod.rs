use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    CompletionAnchor, CompletionRecord, CompletionResult, NewTaskData, RecurrenceRule, Task,
    UpdateTaskData,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use sqlx::FromRow;

pub mod completions;
pub mod tasks;

/// Row layout of the `tasks` table. The recurrence rule is stored flat and
/// only becomes a [`RecurrenceRule`] in [`TaskRow::into_task`], so an unknown
/// tag in the database surfaces as `InvalidRecurrenceType`.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct TaskRow {
    pub id: String,
    pub name: String,
    pub duration_minutes: i64,
    pub disgust_level: i64,
    pub recurrence_type: String,
    pub recurrence_interval: i64,
    pub next_due_date: DateTime<Utc>,
    pub cleaning_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

impl TaskRow {
    pub(crate) fn into_task(self, completions: Vec<CompletionRecord>) -> Result<Task, CoreError> {
        let recurrence = RecurrenceRule::parse(&self.recurrence_type, self.recurrence_interval)?;
        let duration_minutes = u32::try_from(self.duration_minutes)
            .map_err(|_| CoreError::InvalidInput(format!("Stored duration out of range: {}", self.duration_minutes)))?;
        let disgust_level = u8::try_from(self.disgust_level)
            .map_err(|_| CoreError::InvalidInput(format!("Stored disgust level out of range: {}", self.disgust_level)))?;

        Ok(Task {
            id: self.id,
            name: self.name,
            duration_minutes,
            disgust_level,
            recurrence,
            next_due_date: self.next_due_date,
            cleaning_instructions: self.cleaning_instructions,
            created_at: self.created_at,
            updated_at: self.updated_at,
            created_by: self.created_by,
            completions,
        })
    }
}

/// Persistent task store.
#[async_trait]
pub trait TaskRepository {
    /// All tasks with their completions, ascending by next due date.
    async fn load_tasks(&self) -> Result<Vec<Task>, CoreError>;
    async fn find_task_by_id(&self, id: &str) -> Result<Option<Task>, CoreError>;
    async fn find_tasks_by_id_prefix(&self, prefix: &str) -> Result<Vec<Task>, CoreError>;
    async fn create_task(&self, data: NewTaskData, created_by: Option<&str>) -> Result<Task, CoreError>;
    async fn update_task(&self, id: &str, data: UpdateTaskData) -> Result<Task, CoreError>;
    /// Deletes the task and, through the foreign key, its completions.
    async fn delete_task(&self, id: &str) -> Result<(), CoreError>;
}

/// Append-only completion log.
#[async_trait]
pub trait CompletionRepository {
    async fn record_completion(
        &self,
        task_id: &str,
        completed_by: &str,
        completed_at: DateTime<Utc>,
    ) -> Result<CompletionRecord, CoreError>;
    async fn find_completions(&self, task_id: &str) -> Result<Vec<CompletionRecord>, CoreError>;
    /// Records a completion and advances the task's next due date in one transaction.
    ///
    /// The zone of `now` is the calendar the next due date is computed on.
    async fn complete_task(
        &self,
        id: &str,
        completed_by: &str,
        now: DateTime<Tz>,
        anchor: CompletionAnchor,
    ) -> Result<CompletionResult, CoreError>;
}

/// Main repository trait that composes all domain traits
pub trait Repository: TaskRepository + CompletionRepository + Send + Sync {}

/// SQLite implementation of the repository pattern
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for internal use across modules
    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Repository for SqliteRepository {}
