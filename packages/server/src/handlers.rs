//! HTTP handler functions for the situation report API.

use actix_web::{HttpResponse, http::header::ContentType, web};
use chrono::Utc;
use sitrep_consolidate::{consolidate, render_briefing, render_dashboard};
use sitrep_report::ReportError;
use sitrep_report_models::ReportFields;
use sitrep_server_models::{
    ApiError, ApiHealth, ApiResponse, SessionContext, SessionRequest, UpdateReportRequest,
};

use crate::AppState;
use crate::session::Session;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/provinces`
///
/// Lists the provinces that may submit reports.
pub async fn provinces(state: web::Data<AppState>) -> HttpResponse {
    let provinces = state.registry.provinces();
    let count = len_u64(provinces.len());
    HttpResponse::Ok().json(ApiResponse::data(provinces).with_count(count))
}

/// `GET /api/provinces/{code}/municipalities`
pub async fn municipalities(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let code = path.into_inner();
    if !state.registry.contains(&code) {
        return HttpResponse::NotFound().json(ApiError::new(format!("Province not found: {code}")));
    }

    let municipalities = state.registry.municipalities(&code);
    HttpResponse::Ok()
        .json(ApiResponse::data(municipalities).with_count(len_u64(municipalities.len())))
}

/// `POST /api/session`
///
/// Validates the province a field office is logging in as and returns the
/// session the client sends back on later requests.
pub async fn create_session(
    state: web::Data<AppState>,
    body: web::Json<SessionRequest>,
) -> HttpResponse {
    let Some(code) = body
        .province_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    else {
        return HttpResponse::BadRequest()
            .json(ApiError::new("Missing required field: provinceCode"));
    };

    let Some(province) = state.registry.province(code) else {
        return HttpResponse::NotFound().json(ApiError::new(format!("Province not found: {code}")));
    };

    log::info!("Session started for {} ({})", province.name, province.code);

    HttpResponse::Ok().json(
        ApiResponse::data(SessionContext {
            province,
            logged_in_at: Utc::now(),
        })
        .with_message("Logged in"),
    )
}

/// `GET /api/reports`
///
/// Returns every report, most recently updated first.
pub async fn list_reports(state: web::Data<AppState>) -> HttpResponse {
    match sitrep_report::get_all(state.db.as_ref()).await {
        Ok(records) => {
            let count = len_u64(records.len());
            HttpResponse::Ok().json(ApiResponse::data(records).with_count(count))
        }
        Err(e) => error_response(&state, "Failed to fetch reports", &e),
    }
}

/// `GET /api/reports/province/{code}`
pub async fn province_report(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let code = path.into_inner();
    match sitrep_report::get_by_province(state.db.as_ref(), &code).await {
        Ok(Some(record)) => HttpResponse::Ok().json(ApiResponse::data(record)),
        Ok(None) => HttpResponse::NotFound()
            .json(ApiError::new(format!("No report found for province {code}"))),
        Err(e) => error_response(&state, "Failed to fetch report", &e),
    }
}

/// `POST /api/reports`
///
/// Replaces the report of the province named in the body.
pub async fn submit_report(
    state: web::Data<AppState>,
    session: Session,
    body: web::Json<UpdateReportRequest>,
) -> HttpResponse {
    let code = body.province_code().unwrap_or_default().to_string();
    let fields = body.into_inner().fields;
    apply_update(&state, &session, &code, fields).await
}

/// `PUT /api/reports/{code}`
///
/// Replaces the report of the province in the path.
pub async fn replace_report(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<String>,
    body: web::Json<ReportFields>,
) -> HttpResponse {
    let code = path.into_inner();
    apply_update(&state, &session, &code, body.into_inner()).await
}

async fn apply_update(
    state: &AppState,
    session: &Session,
    code: &str,
    fields: ReportFields,
) -> HttpResponse {
    if let Some(ctx) = &session.0
        && ctx.province.code != code.trim()
    {
        log::warn!(
            "{} is submitting a report for another province ({code})",
            session.describe()
        );
    }
    log::info!("Report submission for '{code}' by {}", session.describe());

    match sitrep_report::update(state.db.as_ref(), code, fields).await {
        Ok(affected) => HttpResponse::Ok().json(
            ApiResponse::message("Report updated successfully").with_count(affected),
        ),
        Err(e) => error_response(state, "Failed to update report", &e),
    }
}

/// `POST /api/reports/reset`
///
/// Returns every report to its empty state.
pub async fn reset_reports(state: web::Data<AppState>, session: Session) -> HttpResponse {
    log::info!("Reset of all reports requested by {}", session.describe());
    match sitrep_report::reset_all(state.db.as_ref()).await {
        Ok(count) => HttpResponse::Ok()
            .json(ApiResponse::message("All reports reset to defaults").with_count(count)),
        Err(e) => error_response(&state, "Failed to reset reports", &e),
    }
}

/// `POST /api/reports/archive`
pub async fn archive_reports(state: web::Data<AppState>, session: Session) -> HttpResponse {
    log::info!("Archive of all reports requested by {}", session.describe());
    match sitrep_report::archive_all(state.db.as_ref()).await {
        Ok(count) => {
            HttpResponse::Ok().json(ApiResponse::message("Reports archived").with_count(count))
        }
        Err(e) => error_response(&state, "Failed to archive reports", &e),
    }
}

/// `DELETE /api/reports/{id}`
pub async fn delete_report(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<i64>,
) -> HttpResponse {
    let id = path.into_inner();
    log::info!("Deletion of report {id} requested by {}", session.describe());
    match sitrep_report::delete_one(state.db.as_ref(), id).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message("Report deleted")),
        Err(e) => error_response(&state, "Failed to delete report", &e),
    }
}

/// `DELETE /api/reports`
pub async fn delete_all_reports(state: web::Data<AppState>, session: Session) -> HttpResponse {
    log::info!("Deletion of all reports requested by {}", session.describe());
    match sitrep_report::delete_all(state.db.as_ref()).await {
        Ok(count) => {
            HttpResponse::Ok().json(ApiResponse::message("All reports deleted").with_count(count))
        }
        Err(e) => error_response(&state, "Failed to delete reports", &e),
    }
}

/// `GET /api/reports/consolidated`
///
/// The plain-text briefing for the regional director.
pub async fn consolidated_briefing(state: web::Data<AppState>) -> HttpResponse {
    match sitrep_report::get_all(state.db.as_ref()).await {
        Ok(records) => HttpResponse::Ok()
            .content_type(ContentType::plaintext())
            .body(render_briefing(&consolidate(&records), &state.briefing)),
        Err(e) => error_response(&state, "Failed to build consolidated report", &e),
    }
}

/// `GET /api/reports/dashboard`
///
/// The consolidator dashboard as an HTML fragment.
pub async fn dashboard(state: web::Data<AppState>) -> HttpResponse {
    match sitrep_report::get_all(state.db.as_ref()).await {
        Ok(records) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(render_dashboard(&consolidate(&records))),
        Err(e) => error_response(&state, "Failed to build dashboard", &e),
    }
}

/// Fallback for unmatched `/api` routes.
pub async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiError::new("Route not found"))
}

/// Maps a service error to its status and failure envelope.
///
/// Store failures are logged and reported with `context` as the message;
/// the underlying error is only included when detailed errors are enabled.
fn error_response(state: &AppState, context: &str, e: &ReportError) -> HttpResponse {
    match e {
        ReportError::Validation { .. } => HttpResponse::BadRequest().json(ApiError::new(e.to_string())),
        ReportError::ProvinceNotFound { .. } | ReportError::ReportNotFound { .. } => {
            HttpResponse::NotFound().json(ApiError::new(e.to_string()))
        }
        ReportError::Store(inner) => {
            log::error!("{context}: {inner}");
            let mut body = ApiError::new(context);
            if state.expose_errors {
                body = body.with_detail(inner.to_string());
            }
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn len_u64(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}
