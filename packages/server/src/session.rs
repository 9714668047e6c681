//! Request-scoped reporting session.
//!
//! The report pages remember which province a field office logged in as
//! and send it back on every request in the `X-Province-Code` header
//! (with the optional `X-Login-Time`). [`Session`] resolves those headers
//! against the province registry for the one request being handled and is
//! passed to handlers as an ordinary argument.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use chrono::{DateTime, Utc};
use sitrep_server_models::SessionContext;

use crate::AppState;

/// Header carrying the logged-in province code.
pub const PROVINCE_HEADER: &str = "X-Province-Code";

/// Header carrying the RFC 3339 login time.
pub const LOGIN_TIME_HEADER: &str = "X-Login-Time";

/// The caller's session, if the request carried a known province code.
#[derive(Debug, Clone, Default)]
pub struct Session(pub Option<SessionContext>);

impl Session {
    /// Short description for audit log lines.
    #[must_use]
    pub fn describe(&self) -> String {
        self.0.as_ref().map_or_else(
            || "anonymous".to_string(),
            |ctx| format!("{} ({})", ctx.province.name, ctx.province.code),
        )
    }

    fn from_request_headers(req: &HttpRequest) -> Self {
        let Some(code) = header(req, PROVINCE_HEADER) else {
            return Self(None);
        };

        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            return Self(None);
        };

        let Some(province) = state.registry.province(code) else {
            log::warn!("Ignoring session for unknown province code '{code}'");
            return Self(None);
        };

        let logged_in_at = header(req, LOGIN_TIME_HEADER)
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map_or_else(Utc::now, |t| t.with_timezone(&Utc));

        Self(Some(SessionContext {
            province,
            logged_in_at,
        }))
    }
}

impl FromRequest for Session {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_request_headers(req)))
    }
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
