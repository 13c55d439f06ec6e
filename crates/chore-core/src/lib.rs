//! # Chore Core Library
//!
//! Household chore tracking: recurring cleaning tasks, grouped by when they
//! are due, rescheduled on completion.
//!
//! ## Features
//!
//! - **Recurrence Engine**: daily, weekly, biweekly and monthly rules with an
//!   interval; month-end dates clamp to the last day of the target month
//! - **Due-Date Buckets**: Overdue / Today / Tomorrow / Later by calendar day in
//!   the user's timezone
//! - **Task Store**: SQLite persistence with an append-only completion log
//! - **Sessions**: local sign-in so completions record who did the chore
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and migration management
//! - [`models`]: Core data structures and transfer objects
//! - [`recurrence`]: Next-due-date calculation
//! - [`classify`]: Bucketing of tasks by due date
//! - [`repository`]: Data access layer with Repository pattern
//! - [`session`]: Authentication state
//! - [`timezone`]: Timezone utilities and validation
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chore_core::{
//!     classify::classify,
//!     db,
//!     models::{CompletionAnchor, NewTaskData, RecurrenceRule, RecurrenceType},
//!     repository::{CompletionRepository, SqliteRepository, TaskRepository},
//!     timezone::now_in,
//! };
//! use chrono::Utc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("chore.db").await?;
//!     let repo = SqliteRepository::new(pool);
//!
//!     let task = repo
//!         .create_task(
//!             NewTaskData {
//!                 name: "Clean the fridge".to_string(),
//!                 duration_minutes: 30,
//!                 disgust_level: 4,
//!                 recurrence: RecurrenceRule::new(RecurrenceType::Biweekly, 1)?,
//!                 ..Default::default()
//!             },
//!             None,
//!         )
//!         .await?;
//!
//!     repo.complete_task(&task.id, "me", now_in(chrono_tz::UTC), CompletionAnchor::Now).await?;
//!
//!     let tasks = repo.load_tasks().await?;
//!     for (bucket, tasks) in classify(&tasks, &Utc::now())? {
//!         println!("{}: {}", bucket, tasks.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod db;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod repository;
pub mod session;
pub mod timezone;
