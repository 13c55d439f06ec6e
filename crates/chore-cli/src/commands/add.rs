use anyhow::Result;
use chore_core::models::{NewTaskData, RecurrenceRule};
use chore_core::repository::{Repository, TaskRepository};
use chore_core::session::User;
use chore_core::timezone::{format_in, now_in};
use owo_colors::{OwoColorize, Style};

use crate::cli::AddCommand;
use crate::config::Config;
use crate::parser::parse_due_date;

pub async fn add_task(
    repo: &impl Repository,
    command: AddCommand,
    user: &User,
    config: &Config,
) -> Result<()> {
    let tz = config.tz()?;
    let recurrence = RecurrenceRule::parse(&command.every, command.interval as i64)?;
    let next_due_date = command
        .due
        .as_deref()
        .map(|d| parse_due_date(d, now_in(tz)))
        .transpose()?;

    let new_task_data = NewTaskData {
        name: command.name,
        duration_minutes: command.duration,
        disgust_level: command.disgust,
        recurrence,
        next_due_date,
        cleaning_instructions: command.instructions,
    };

    let task = repo.create_task(new_task_data, Some(&user.id)).await?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    println!(
        "{} Added chore: {}",
        "✓".style(success_style),
        task.name.bright_white().bold()
    );
    println!("  {} ID: {}", "→".style(info_style), task.id.yellow());
    println!(
        "  {} Repeats: {}",
        "→".style(info_style),
        task.recurrence
    );
    println!(
        "  {} First due: {}",
        "→".style(info_style),
        format_in(task.next_due_date, tz, "%a %Y-%m-%d %H:%M")
    );

    Ok(())
}
