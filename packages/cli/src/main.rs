#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line tool for the CARAGA situation report service.
//!
//! ```text
//! sitrep serve [--bind 0.0.0.0] [--port 3000] [--static-dir public] [--expose-errors]
//! sitrep briefing
//! sitrep dashboard
//! sitrep list
//! sitrep reset [--yes]
//! sitrep archive [--yes]
//! sitrep delete <id> [--yes]
//! sitrep delete --all [--yes]
//! ```
//!
//! Every command accepts `--db <path>` (or `SITREP_DB_PATH`). Running
//! `sitrep` with no subcommand enters interactive mode.

mod commands;
mod interactive;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sitrep_server::ServerConfig;

#[derive(Parser)]
#[command(
    name = "sitrep",
    about = "Run and administer the CARAGA disaster situation report service"
)]
struct Cli {
    /// Path to the report database
    #[arg(long, global = true, env = "SITREP_DB_PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Print the consolidated briefing text
    Briefing,
    /// Print the consolidator dashboard HTML
    Dashboard,
    /// List every province report
    List,
    /// Reset every report to empty
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Mark every report as archived
    Archive {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Permanently delete one report, or all of them
    Delete {
        /// Report id
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        id: Option<i64>,
        /// Delete every report
        #[arg(long)]
        all: bool,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// Interface to bind
    #[arg(long)]
    bind: Option<String>,
    /// TCP port
    #[arg(long)]
    port: Option<u16>,
    /// Directory of static report pages
    #[arg(long)]
    static_dir: Option<PathBuf>,
    /// Include underlying error detail in 500 responses
    #[arg(long)]
    expose_errors: bool,
}

impl ServeArgs {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(dir) = self.static_dir {
            config.static_dir = dir;
        }
        if self.expose_errors {
            config.expose_errors = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    let Some(command) = cli.command else {
        return interactive::run(config).await;
    };

    if let Commands::Serve(args) = command {
        args.apply(&mut config);
        return commands::serve(config, false).await;
    }

    let db = commands::open_store(&config.db_path).await?;
    let db = db.as_ref();

    match command {
        Commands::Briefing => commands::briefing(db, &config.briefing).await?,
        Commands::Dashboard => commands::dashboard(db).await?,
        Commands::List => commands::list(db).await?,
        Commands::Reset { yes } => commands::reset(db, yes).await?,
        Commands::Archive { yes } => commands::archive(db, yes).await?,
        Commands::Delete { id, yes, .. } => commands::delete(db, id, yes).await?,
        Commands::Serve(_) => {}
    }

    Ok(())
}
