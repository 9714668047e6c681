#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the situation report server.
//!
//! Every JSON response is wrapped in an envelope carrying a `success`
//! flag, mirroring what the report form and consolidator pages expect.
//! These types are separate from the report models to allow independent
//! evolution of the API contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitrep_province_models::Province;
use sitrep_report_models::ReportFields;

/// Successful response envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Number of items in `data`, or rows affected by a bulk operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    /// Human-readable outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Wraps a payload.
    #[must_use]
    pub const fn data(data: T) -> Self {
        Self {
            success: true,
            count: None,
            message: None,
            data: Some(data),
        }
    }

    /// Adds a count to the envelope.
    #[must_use]
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Adds a message to the envelope.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// A payload-less success with a message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            count: None,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Failure response envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Always `false`.
    pub success: bool,
    /// User-facing reason, shown in the client's alert dialog.
    pub message: String,
    /// Underlying error detail. Omitted unless detailed errors are enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiError {
    /// Creates a failure envelope without detail.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
        }
    }

    /// Attaches error detail.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.error = Some(detail.into());
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Province reference embedded in an update request.
///
/// Both keys are optional at the type level so that a missing code can be
/// reported as a validation failure instead of a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceRef {
    /// Province code.
    #[serde(default)]
    pub code: Option<String>,
    /// Province display name. Informational only; the store's name wins.
    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `POST /api/reports`: the complete form plus the province it
/// belongs to.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportRequest {
    /// The province being reported on.
    #[serde(default)]
    pub province: Option<ProvinceRef>,
    #[serde(flatten)]
    pub fields: ReportFields,
}

impl UpdateReportRequest {
    /// Returns the non-blank province code, if present.
    #[must_use]
    pub fn province_code(&self) -> Option<&str> {
        self.province
            .as_ref()
            .and_then(|p| p.code.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Body of `POST /api/session`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    /// Province the field office is logging in as.
    #[serde(default)]
    pub province_code: Option<String>,
}

/// A field office's reporting session.
///
/// Returned by `POST /api/session` and held by the client for the life of
/// the browser session; sent back on each request as the
/// `X-Province-Code` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    /// The logged-in province.
    pub province: Province,
    /// When the session was established.
    pub logged_in_at: DateTime<Utc>,
}
