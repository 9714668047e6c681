//! Interactive menu shown when `sitrep` runs without a subcommand.

use dialoguer::{Input, Select};
use sitrep_server::ServerConfig;

use crate::commands;

/// Top-level actions offered by the menu.
enum Action {
    Serve,
    Briefing,
    Dashboard,
    List,
    Reset,
    Archive,
    DeleteOne,
    DeleteAll,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Serve,
        Self::Briefing,
        Self::Dashboard,
        Self::List,
        Self::Reset,
        Self::Archive,
        Self::DeleteOne,
        Self::DeleteAll,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Serve => "Start server",
            Self::Briefing => "Print consolidated briefing",
            Self::Dashboard => "Print dashboard HTML",
            Self::List => "List reports",
            Self::Reset => "Reset all reports",
            Self::Archive => "Archive all reports",
            Self::DeleteOne => "Delete a report",
            Self::DeleteAll => "Delete all reports",
        }
    }
}

/// Prompts for an action and runs it.
pub async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("CARAGA Situation Reports");
    println!();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    if matches!(Action::ALL[idx], Action::Serve) {
        return commands::serve(config, true).await;
    }

    let db = commands::open_store(&config.db_path).await?;
    let db = db.as_ref();

    match Action::ALL[idx] {
        Action::Serve => {}
        Action::Briefing => commands::briefing(db, &config.briefing).await?,
        Action::Dashboard => commands::dashboard(db).await?,
        Action::List => commands::list(db).await?,
        Action::Reset => commands::reset(db, false).await?,
        Action::Archive => commands::archive(db, false).await?,
        Action::DeleteOne => {
            commands::list(db).await?;
            let id: i64 = Input::new().with_prompt("Report id").interact_text()?;
            commands::delete(db, Some(id), false).await?;
        }
        Action::DeleteAll => commands::delete(db, None, false).await?,
    }

    Ok(())
}
