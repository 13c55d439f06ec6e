use anyhow::Result;
use chore_core::db;
use chore_core::error::CoreError;
use chore_core::repository::SqliteRepository;
use chore_core::session::{FileSessionStore, SessionStore};
use clap::Parser;
use owo_colors::{OwoColorize, Style};

mod cli;
mod commands;
mod config;
mod parser;
mod util;
mod views;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    let config = match config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} Invalid configuration: {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    tracing::debug!(?config, "loaded configuration");

    if let Err(e) = run(cli.command, &config).await {
        handle_error(e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    const NOISY_CRATES: &str = ",sqlx=warn";

    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level}{NOISY_CRATES}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn run(command: cli::Commands, config: &config::Config) -> Result<()> {
    let sessions = FileSessionStore::new(&config.session_path);

    match command {
        cli::Commands::Login(command) => return commands::auth::login(&sessions, command).await,
        cli::Commands::Logout => return commands::auth::logout(&sessions).await,
        cli::Commands::Whoami => return commands::auth::whoami(&sessions).await,
        _ => {}
    }

    let user = sessions.require_user().await?;
    let db_pool = db::establish_connection(&config.database_path).await?;
    let repository = SqliteRepository::new(db_pool);

    match command {
        cli::Commands::Add(command) => {
            commands::add::add_task(&repository, command, &user, config).await
        }
        cli::Commands::List(command) => {
            commands::list::list_tasks(&repository, command, config).await
        }
        cli::Commands::Show(command) => {
            commands::show::show_task(&repository, &sessions, command, config).await
        }
        cli::Commands::Edit(command) => {
            commands::edit::edit_task(&repository, command, config).await
        }
        cli::Commands::Do(command) => {
            commands::r#do::do_task(&repository, command, &user, config).await
        }
        cli::Commands::Delete(command) => commands::delete::delete_task(&repository, command).await,
        cli::Commands::Export(command) => commands::export::export_tasks(&repository, command).await,
        cli::Commands::Login(_) | cli::Commands::Logout | cli::Commands::Whoami => Ok(()),
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::AmbiguousId(tasks) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, name) in tasks {
                    eprintln!("  {} ({})", id.yellow(), name);
                }
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            CoreError::InvalidRecurrenceType(tag) => {
                eprintln!(
                    "{} Unknown recurrence '{}'. Use one of: daily, weekly, biweekly, monthly",
                    "Error:".style(error_style),
                    tag
                );
            }
            CoreError::Unauthenticated => {
                eprintln!("{} {}", "Error:".style(error_style), core_error);
            }
            CoreError::Database(e) => {
                eprintln!("{} Database error: {}", "Error:".style(error_style), e);
            }
            _ => eprintln!("{} {:#}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {:#}", "Error:".style(error_style), err);
    }
}
