use anyhow::Result;
use chore_core::error::CoreError;
use chore_core::recurrence::preview;
use chore_core::repository::{Repository, TaskRepository};
use chore_core::session::FileSessionStore;
use chrono::Utc;
use owo_colors::OwoColorize;

use crate::cli::ShowCommand;
use crate::config::Config;
use crate::util::resolve_task_id;
use crate::views::table::{display_completions, display_task_details};

const UPCOMING_COUNT: usize = 3;

pub async fn show_task(
    repo: &impl Repository,
    sessions: &FileSessionStore,
    command: ShowCommand,
    config: &Config,
) -> Result<()> {
    let tz = config.tz()?;
    let task_id = resolve_task_id(repo, &command.id).await?;
    let task = repo
        .find_task_by_id(&task_id)
        .await?
        .ok_or_else(|| CoreError::NotFound(task_id.clone()))?;

    let upcoming: Vec<_> = preview(&task.recurrence, task.next_due_date.with_timezone(&tz), UPCOMING_COUNT)?
        .into_iter()
        .map(|due| due.with_timezone(&Utc))
        .collect();
    display_task_details(&task, tz, &upcoming);

    println!();
    println!("{}", "History".bold());
    let names = sessions.user_names().await?;
    display_completions(&task.completions, &names, tz);

    Ok(())
}
