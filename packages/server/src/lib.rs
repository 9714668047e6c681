#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for CARAGA disaster situation reports.
//!
//! Provincial field offices submit one report per province through the
//! REST API, and the regional consolidator reads them back as JSON, as an
//! HTML dashboard fragment, or as the plain-text briefing sent to the
//! regional director. The static report pages are served from the
//! configured directory when it exists.

pub mod config;
mod handlers;
pub mod interactive;
pub mod session;

use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use sitrep_consolidate::BriefingTemplate;
use sitrep_database::{DbError, open_db};
use sitrep_province_models::ProvinceRegistry;
use sitrep_report::ReportError;
use sitrep_server_models::ApiError;
use switchy_database::Database;
use thiserror::Error;

pub use config::{ConfigError, ServerConfig};

/// Shared application state.
pub struct AppState {
    /// Report store.
    pub db: Arc<dyn Database>,
    /// Provinces that may submit reports.
    pub registry: ProvinceRegistry,
    /// Include underlying error detail in 500 responses.
    pub expose_errors: bool,
    /// Opening lines of the consolidated briefing.
    pub briefing: BriefingTemplate,
}

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The report database could not be opened.
    #[error(transparent)]
    Database(#[from] DbError),
    /// Seeding the province records failed.
    #[error(transparent)]
    Report(#[from] ReportError),
    /// Binding or serving failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Registers the `/api` routes.
///
/// Expects a `web::Data<AppState>` to be registered on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .app_data(path_config())
            .route("/health", web::get().to(handlers::health))
            .route("/provinces", web::get().to(handlers::provinces))
            .route(
                "/provinces/{code}/municipalities",
                web::get().to(handlers::municipalities),
            )
            .route("/session", web::post().to(handlers::create_session))
            .route("/reports", web::get().to(handlers::list_reports))
            .route("/reports", web::post().to(handlers::submit_report))
            .route("/reports", web::delete().to(handlers::delete_all_reports))
            .route("/reports/reset", web::post().to(handlers::reset_reports))
            .route("/reports/archive", web::post().to(handlers::archive_reports))
            .route(
                "/reports/consolidated",
                web::get().to(handlers::consolidated_briefing),
            )
            .route("/reports/dashboard", web::get().to(handlers::dashboard))
            .route(
                "/reports/province/{code}",
                web::get().to(handlers::province_report),
            )
            .route("/reports/{code}", web::put().to(handlers::replace_report))
            .route("/reports/{id}", web::delete().to(handlers::delete_report))
            .default_service(web::to(handlers::route_not_found)),
    );
}

/// Malformed request bodies get the same failure envelope as every other
/// client error.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let body = ApiError::new("Invalid request body").with_detail(err.to_string());
        actix_web::error::InternalError::from_response(err, HttpResponse::BadRequest().json(body))
            .into()
    })
}

/// The only fallible path segment is a report id, so a malformed one is
/// reported like an unknown one.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::NotFound().json(ApiError::new("Report not found")),
        )
        .into()
    })
}

/// Starts the situation report API server.
///
/// Opens (and if needed creates) the report database, seeds an empty
/// record for every CARAGA province, and starts the Actix-Web HTTP
/// server. The caller provides the async runtime (e.g. via
/// `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// * [`ServerError::Database`] if the database cannot be opened
/// * [`ServerError::Report`] if seeding fails
/// * [`ServerError::Io`] if the HTTP server fails to bind or run
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    log::info!("Opening report database at {}...", config.db_path.display());
    let db = open_db(&config.db_path).await?;

    let registry = ProvinceRegistry::caraga().clone();
    sitrep_report::initialize(db.as_ref(), &registry).await?;

    let state = web::Data::new(AppState {
        db: Arc::from(db),
        registry,
        expose_errors: config.expose_errors,
        briefing: config.briefing.clone(),
    });

    let static_dir = if config.static_dir.is_dir() {
        Some(config.static_dir.clone())
    } else {
        log::warn!(
            "Static directory {} not found; serving the API only",
            config.static_dir.display()
        );
        None
    };

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let mut app = App::new().app_data(state.clone()).configure(configure);

        // Registered last so it never shadows `/api`.
        if let Some(dir) = &static_dir {
            app = app.service(Files::new("/", dir.clone()).index_file("index.html"));
        }

        app.wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
