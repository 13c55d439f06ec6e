use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::debug;

use crate::error::CoreError;

// Re-export the pool for use in other parts of the core crate
pub use sqlx::SqlitePool as DbPool;

/// Establishes a connection pool to the SQLite database and runs migrations.
///
/// # Arguments
///
/// * `db_path` - The path to the SQLite database file, or `sqlite::memory:`.
///
/// # Returns
///
/// A `Result` containing the `SqlitePool` or a `CoreError` if the connection fails
/// or migrations cannot be run.
pub async fn establish_connection(db_path: &str) -> Result<SqlitePool, CoreError> {
    let in_memory = db_path.starts_with("sqlite::memory:");

    if !in_memory {
        // Create the database file and directory if they don't exist
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        if !Path::new(db_path).exists() {
            tokio::fs::File::create(db_path).await?;
        }
    }

    let url = if in_memory {
        db_path.to_string()
    } else {
        format!("sqlite://{}", db_path)
    };

    let mut options = SqlitePoolOptions::new().max_connections(5);
    if in_memory {
        // An in-memory database lives as long as its only connection.
        options = options.max_connections(1).idle_timeout(None).max_lifetime(None);
    }
    let pool = options.connect(&url).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    debug!(path = db_path, "database ready");

    Ok(pool)
}
