use anyhow::{Context, Result};
use chore_core::error::CoreError;
use chore_core::repository::{Repository, TaskRepository};
use dialoguer::Confirm;

use crate::cli::DeleteCommand;
use crate::util::resolve_task_id;

pub async fn delete_task(repo: &impl Repository, command: DeleteCommand) -> Result<()> {
    let task_id = resolve_task_id(repo, &command.id).await?;
    let task = repo
        .find_task_by_id(&task_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(task_id.clone()))?;

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt(format!(
                "Are you sure you want to delete '{}' and its history?",
                task.name
            ))
            .default(false)
            .interact()
            .context("Could not ask for confirmation; pass --force to delete without asking")?;

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    repo.delete_task(&task_id).await?;
    println!("Deleted chore '{}'", task.name);
    Ok(())
}
