use anyhow::Result;
use chore_core::error::CoreError;
use chore_core::models::{RecurrenceRule, UpdateTaskData};
use chore_core::repository::{Repository, TaskRepository};
use chore_core::timezone::now_in;

use crate::cli::EditCommand;
use crate::config::Config;
use crate::parser::parse_due_date;
use crate::util::resolve_task_id;

pub async fn edit_task(repo: &impl Repository, command: EditCommand, config: &Config) -> Result<()> {
    let task_id = resolve_task_id(repo, &command.id).await?;

    // Changing only the interval or only the cadence keeps the other half of the rule.
    let recurrence = if command.every.is_some() || command.interval.is_some() {
        let task = repo
            .find_task_by_id(&task_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(task_id.clone()))?;
        let tag = command
            .every
            .unwrap_or_else(|| task.recurrence.kind.to_string());
        let interval = command.interval.unwrap_or(task.recurrence.interval);
        Some(RecurrenceRule::parse(&tag, interval as i64)?)
    } else {
        None
    };

    let next_due_date = match command.due.as_deref() {
        Some(due) => Some(parse_due_date(due, now_in(config.tz()?))?),
        None => None,
    };

    let cleaning_instructions = if command.instructions_clear {
        Some(None)
    } else {
        command.instructions.map(Some)
    };

    let update_data = UpdateTaskData {
        name: command.name,
        duration_minutes: command.duration,
        disgust_level: command.disgust,
        recurrence,
        next_due_date,
        cleaning_instructions,
    };

    if update_data.is_empty() {
        println!("Nothing to change.");
        return Ok(());
    }

    let updated_task = repo.update_task(&task_id, update_data).await?;
    println!("Updated chore '{}' ({})", updated_task.name, updated_task.id);

    Ok(())
}
