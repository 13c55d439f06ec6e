use anyhow::{anyhow, Result};
use chore_core::error::CoreError;
use chore_core::repository::TaskRepository;

/// Length of the ID prefix shown in tables.
pub const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

pub async fn resolve_task_id(repo: &(impl TaskRepository + Sync), short_id: &str) -> Result<String> {
    let short_id = short_id.trim();
    if short_id.len() < 2 {
        return Err(anyhow!(CoreError::InvalidInput(
            "Short ID must be at least 2 characters long.".to_string()
        )));
    }
    let tasks = repo.find_tasks_by_id_prefix(short_id).await?;
    match tasks.len() {
        1 => Ok(tasks[0].id.clone()),
        0 => Err(anyhow!(CoreError::NotFound(format!(
            "No chore found with ID prefix '{}'",
            short_id
        )))),
        _ => {
            let task_info: Vec<(String, String)> =
                tasks.into_iter().map(|t| (t.id, t.name)).collect();
            Err(anyhow!(CoreError::AmbiguousId(task_info)))
        }
    }
}
