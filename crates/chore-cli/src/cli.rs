use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Keep track of household chores: what is overdue, what is due today, and who did it last
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). Overridden by RUST_LOG.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Sign in as a household member
    Login(LoginCommand),
    /// Sign out
    Logout,
    /// Show who is signed in
    Whoami,
    /// Add a new chore
    Add(AddCommand),
    /// List chores grouped by when they are due
    List(ListCommand),
    /// Show a chore with its completion history
    Show(ShowCommand),
    /// Edit a chore
    Edit(EditCommand),
    /// Mark a chore as done and schedule the next one
    Do(DoCommand),
    /// Delete a chore
    Delete(DeleteCommand),
    /// Export all chores as JSON
    Export(ExportCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct LoginCommand {
    /// Your display name
    pub name: String,
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The name of the chore
    pub name: String,
    /// How long the chore takes, in minutes
    #[clap(short = 'm', long)]
    pub duration: u32,
    /// How unpleasant the chore is, from 1 to 5
    #[clap(short = 'g', long, default_value_t = 3)]
    pub disgust: u8,
    /// How often the chore repeats (daily, weekly, biweekly, monthly)
    #[clap(short, long)]
    pub every: String,
    /// Repeat every N periods
    #[clap(short, long, default_value_t = 1)]
    pub interval: u32,
    /// How to do the chore
    #[clap(long)]
    pub instructions: Option<String>,
    /// When the chore is first due (e.g. 'tomorrow', 'next friday'). Defaults to now.
    #[clap(short, long)]
    pub due: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Print the buckets as JSON
    #[arg(long)]
    pub json: bool,
    /// Classify chores from an exported JSON file instead of the database
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// The ID of the chore to show
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID of the chore to edit
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub duration: Option<u32>,

    #[arg(long)]
    pub disgust: Option<u8>,

    #[arg(long)]
    pub every: Option<String>,

    #[arg(long)]
    pub interval: Option<u32>,

    #[arg(long)]
    pub due: Option<String>,

    #[arg(long)]
    pub instructions: Option<String>,
    #[arg(long, conflicts_with = "instructions")]
    pub instructions_clear: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DoCommand {
    /// The ID of the chore that was done
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the chore to delete
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportCommand {
    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_requires_duration_and_every() {
        assert!(Cli::try_parse_from(["chore", "add", "Dishes"]).is_err());
        assert!(Cli::try_parse_from(["chore", "add", "Dishes", "-m", "10"]).is_err());

        let cli = Cli::try_parse_from(["chore", "add", "Dishes", "-m", "10", "-e", "daily"]).unwrap();
        match cli.command {
            Commands::Add(cmd) => {
                assert_eq!(cmd.name, "Dishes");
                assert_eq!(cmd.duration, 10);
                assert_eq!(cmd.disgust, 3);
                assert_eq!(cmd.every, "daily");
                assert_eq!(cmd.interval, 1);
                assert!(cmd.due.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_edit_instructions_conflict() {
        let result = Cli::try_parse_from([
            "chore",
            "edit",
            "ab",
            "--instructions",
            "scrub",
            "--instructions-clear",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["chore", "list", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
