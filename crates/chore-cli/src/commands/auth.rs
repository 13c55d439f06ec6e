use anyhow::Result;
use chore_core::session::SessionStore;
use owo_colors::{OwoColorize, Style};

use crate::cli::LoginCommand;

pub async fn login(store: &(impl SessionStore + Sync), command: LoginCommand) -> Result<()> {
    let session = store.sign_in(&command.name).await?;
    println!(
        "{} Signed in as {}",
        "✓".style(Style::new().green().bold()),
        session.user.display_name.bright_white().bold()
    );
    Ok(())
}

pub async fn logout(store: &(impl SessionStore + Sync)) -> Result<()> {
    if store.sign_out().await? {
        println!("Signed out.");
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

pub async fn whoami(store: &(impl SessionStore + Sync)) -> Result<()> {
    match store.current_user().await? {
        Some(user) => println!("{} ({})", user.display_name.bold(), user.id.dimmed()),
        None => println!("Not signed in."),
    }
    Ok(())
}
