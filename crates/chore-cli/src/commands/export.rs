use anyhow::{Context, Result};
use chore_core::models::TaskRecord;
use chore_core::repository::{Repository, TaskRepository};

use crate::cli::ExportCommand;

pub async fn export_tasks(repo: &impl Repository, command: ExportCommand) -> Result<()> {
    let tasks = repo.load_tasks().await?;
    let records: Vec<TaskRecord> = tasks.iter().map(TaskRecord::from).collect();
    let json = serde_json::to_string_pretty(&records)?;

    match command.output {
        Some(path) => {
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Exported {} chores to {}", records.len(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
