//! Report administration commands shared by the subcommands and the
//! interactive menu.

use std::fmt::Write as _;
use std::path::Path;

use dialoguer::Confirm;
use sitrep_consolidate::{BriefingTemplate, consolidate, render_briefing, render_dashboard};
use sitrep_province_models::ProvinceRegistry;
use sitrep_report_models::ReportRecord;
use sitrep_server::ServerConfig;
use switchy_database::Database;

type CmdResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Opens the report store and makes sure every province has a record.
pub async fn open_store(path: &Path) -> CmdResult<Box<dyn Database>> {
    let db = sitrep_database::open_db(path).await?;
    sitrep_report::initialize(db.as_ref(), ProvinceRegistry::caraga()).await?;
    Ok(db)
}

/// Starts the API server.
///
/// The server runs on actix-web's own runtime, so it is driven from a
/// blocking task to avoid nesting tokio runtimes.
pub async fn serve(config: ServerConfig, interactive: bool) -> CmdResult {
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(async move {
            if interactive {
                sitrep_server::interactive::run(config).await
            } else {
                sitrep_server::run_server(config).await
            }
        })
    })
    .await??;
    Ok(())
}

/// Prints the consolidated plain-text briefing.
pub async fn briefing(db: &dyn Database, template: &BriefingTemplate) -> CmdResult {
    let records = sitrep_report::get_all(db).await?;
    println!("{}", render_briefing(&consolidate(&records), template));
    Ok(())
}

/// Prints the consolidator dashboard HTML fragment.
pub async fn dashboard(db: &dyn Database) -> CmdResult {
    let records = sitrep_report::get_all(db).await?;
    print!("{}", render_dashboard(&consolidate(&records)));
    Ok(())
}

/// Prints a one-line summary per report.
pub async fn list(db: &dyn Database) -> CmdResult {
    let records = sitrep_report::get_all(db).await?;
    if records.is_empty() {
        println!("No reports found.");
        return Ok(());
    }
    print!("{}", format_report_table(&records));
    println!("\n{} report(s)", records.len());
    Ok(())
}

/// Returns every report to the empty state after confirmation.
pub async fn reset(db: &dyn Database, yes: bool) -> CmdResult {
    if !confirm("Reset ALL province reports to empty?", yes)? {
        println!("Cancelled.");
        return Ok(());
    }
    let count = sitrep_report::reset_all(db).await?;
    println!("Reset {count} report(s).");
    Ok(())
}

/// Archives every report after confirmation.
pub async fn archive(db: &dyn Database, yes: bool) -> CmdResult {
    if !confirm("Archive ALL province reports?", yes)? {
        println!("Cancelled.");
        return Ok(());
    }
    let count = sitrep_report::archive_all(db).await?;
    println!("Archived {count} report(s).");
    Ok(())
}

/// Deletes one report by id, or every report when `id` is `None`.
///
/// An unknown id is returned as an error.
pub async fn delete(db: &dyn Database, id: Option<i64>, yes: bool) -> CmdResult {
    let prompt = id.map_or_else(
        || "Permanently delete ALL reports?".to_string(),
        |id| format!("Permanently delete report {id}?"),
    );
    if !confirm(&prompt, yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    match id {
        Some(id) => {
            sitrep_report::delete_one(db, id).await?;
            println!("Deleted report {id}.");
        }
        None => {
            let count = sitrep_report::delete_all(db).await?;
            println!("Deleted {count} report(s).");
        }
    }
    Ok(())
}

fn confirm(prompt: &str, yes: bool) -> Result<bool, dialoguer::Error> {
    if yes {
        return Ok(true);
    }
    Confirm::new().with_prompt(prompt).default(false).interact()
}

/// Formats records as a fixed-width table.
#[must_use]
pub fn format_report_table(records: &[ReportRecord]) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "{:<6} {:<6} {:<20} {:<10} UPDATED",
        "ID", "CODE", "PROVINCE", "STATUS"
    )
    .unwrap();
    writeln!(out, "{}", "-".repeat(70)).unwrap();

    for record in records {
        let status = if record.archived_at.is_some() {
            "archived"
        } else if record.is_empty() {
            "empty"
        } else {
            "reported"
        };
        writeln!(
            out,
            "{:<6} {:<6} {:<20} {:<10} {}",
            record.id,
            record.province.code,
            record.province.name,
            status,
            record.updated_at.format("%Y-%m-%d %H:%M:%S"),
        )
        .unwrap();
    }
    out
}
