use std::collections::BTreeMap;

use chore_core::classify::Buckets;
use chore_core::models::{Bucket, CompletionRecord, Task};
use chore_core::timezone::format_in;
use chrono::{DateTime, Utc};
use chrono_humanize::Humanize;
use chrono_tz::Tz;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use owo_colors::{OwoColorize, Style};

use crate::util::short_id;

const DATE_FORMAT: &str = "%a %Y-%m-%d %H:%M";

fn bucket_color(bucket: Bucket) -> Color {
    match bucket {
        Bucket::Overdue => Color::Red,
        Bucket::Today => Color::Yellow,
        Bucket::Tomorrow => Color::Cyan,
        Bucket::Later => Color::Reset,
    }
}

fn bucket_style(bucket: Bucket) -> Style {
    match bucket {
        Bucket::Overdue => Style::new().red().bold(),
        Bucket::Today => Style::new().yellow().bold(),
        Bucket::Tomorrow => Style::new().cyan().bold(),
        Bucket::Later => Style::new().bold(),
    }
}

pub fn disgust_meter(level: u8) -> String {
    "🤢".repeat(level as usize)
}

pub fn display_buckets(buckets: &Buckets<'_, Task>, tz: Tz) {
    if buckets.is_empty() {
        println!("Nothing to clean. Add a chore with `chore add`.");
        return;
    }

    for (bucket, tasks) in buckets {
        println!(
            "{} {}",
            bucket.label().style(bucket_style(*bucket)),
            format!("({})", tasks.len()).dimmed()
        );
        println!("{}", bucket_table(*bucket, tasks, tz));
        println!();
    }
}

fn bucket_table(bucket: Bucket, tasks: &[&Task], tz: Tz) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Chore", "Due", "Takes", "Disgust", "Repeats"]);

    for task in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(short_id(&task.id)));

        let mut name_cell = Cell::new(&task.name);
        if bucket == Bucket::Overdue {
            name_cell = name_cell.add_attribute(Attribute::Bold);
        }
        row.add_cell(name_cell);

        let due_text = format!(
            "{} ({})",
            task.next_due_date.humanize(),
            format_in(task.next_due_date, tz, "%a %d %b")
        );
        row.add_cell(Cell::new(due_text).fg(bucket_color(bucket)));
        row.add_cell(Cell::new(format!("{} min", task.duration_minutes)));
        row.add_cell(Cell::new(disgust_meter(task.disgust_level)));
        row.add_cell(Cell::new(task.recurrence.to_string()));
        table.add_row(row);
    }

    table
}

pub fn display_task_details(task: &Task, tz: Tz, upcoming: &[DateTime<Utc>]) {
    let mut table = Table::new();
    table.add_row(vec![Cell::new("ID"), Cell::new(&task.id)]);
    table.add_row(vec![
        Cell::new("Name"),
        Cell::new(&task.name).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Duration"),
        Cell::new(format!("{} min", task.duration_minutes)),
    ]);
    table.add_row(vec![
        Cell::new("Disgust"),
        Cell::new(format!(
            "{} ({}/5)",
            disgust_meter(task.disgust_level),
            task.disgust_level
        )),
    ]);
    table.add_row(vec![
        Cell::new("Repeats"),
        Cell::new(task.recurrence.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Next due"),
        Cell::new(format!(
            "{} ({})",
            format_in(task.next_due_date, tz, DATE_FORMAT),
            task.next_due_date.humanize()
        )),
    ]);
    if !upcoming.is_empty() {
        let dates: Vec<String> = upcoming
            .iter()
            .map(|d| format_in(*d, tz, DATE_FORMAT))
            .collect();
        table.add_row(vec![Cell::new("Then"), Cell::new(dates.join("\n"))]);
    }
    table.add_row(vec![
        Cell::new("Instructions"),
        Cell::new(task.cleaning_instructions.as_deref().unwrap_or("None")),
    ]);
    table.add_row(vec![
        Cell::new("Created"),
        Cell::new(task.created_at.humanize()),
    ]);

    println!("{table}");
}

/// Completion history, newest first. `names` maps user ids to display names.
pub fn display_completions(
    completions: &[CompletionRecord],
    names: &BTreeMap<String, String>,
    tz: Tz,
) {
    if completions.is_empty() {
        println!("Never done yet.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Done", "When", "By"]);

    for completion in completions.iter().rev() {
        let by = names
            .get(&completion.completed_by)
            .cloned()
            .unwrap_or_else(|| short_id(&completion.completed_by).to_string());
        table.add_row(vec![
            Cell::new(format_in(completion.completed_at, tz, DATE_FORMAT)),
            Cell::new(completion.completed_at.humanize()),
            Cell::new(by),
        ]);
    }

    println!("{table}");
}
