use anyhow::Result;
use chore_core::repository::{CompletionRepository, Repository};
use chore_core::session::User;
use chore_core::timezone::{format_in, now_in};
use chrono_humanize::Humanize;
use owo_colors::{OwoColorize, Style};

use crate::cli::DoCommand;
use crate::config::Config;
use crate::util::resolve_task_id;

pub async fn do_task(repo: &impl Repository, command: DoCommand, user: &User, config: &Config) -> Result<()> {
    let tz = config.tz()?;
    let task_id = resolve_task_id(repo, &command.id).await?;
    let result = repo
        .complete_task(&task_id, &user.id, now_in(tz), config.completion_anchor)
        .await?;

    println!(
        "{} {} did '{}'",
        "✓".style(Style::new().green().bold()),
        user.display_name.bold(),
        result.task.name
    );
    println!(
        "  {} Next due: {} ({})",
        "→".style(Style::new().blue()),
        format_in(result.task.next_due_date, tz, "%a %Y-%m-%d %H:%M"),
        result.task.next_due_date.humanize()
    );

    Ok(())
}
