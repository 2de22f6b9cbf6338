// src/error.rs
use std::collections::BTreeMap;

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field name -> validation message.
pub type FieldErrors = BTreeMap<String, String>;

pub const VALIDATION_FAILED: &str = "Validation failed";
pub const INTEGRITY_VIOLATED: &str = "Data integrity constraint violated";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Validation failed: {0:?}")]
    Validation(FieldErrors),

    #[error("{0}")]
    MalformedRequest(String),

    /// Storage-enforced constraint failure. The detail is logged, never returned.
    #[error("Data integrity constraint violated: {0}")]
    Integrity(String),

    #[error("{0}")]
    Database(sqlx::Error),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        AppError::MalformedRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        // SQLSTATE class 23: integrity constraint violation
        let integrity = err
            .as_database_error()
            .filter(|db_err| db_err.code().is_some_and(|code| code.starts_with("23")))
            .map(|db_err| db_err.message().to_string());

        match integrity {
            Some(detail) => AppError::Integrity(detail),
            None => AppError::Database(err),
        }
    }
}

/// Status, message and optional field detail for one error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub status: StatusCode,
    pub message: String,
    pub field_errors: Option<FieldErrors>,
}

/// The single place where error variants are mapped to HTTP semantics.
pub fn classify(err: &AppError) -> Classified {
    let (status, message, field_errors) = match err {
        AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
        AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone(), None),
        AppError::Validation(fields) => (
            StatusCode::BAD_REQUEST,
            VALIDATION_FAILED.to_string(),
            Some(fields.clone()),
        ),
        AppError::MalformedRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
        AppError::Integrity(_) => (StatusCode::CONFLICT, INTEGRITY_VIOLATED.to_string(), None),
        AppError::Database(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), None),
        AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), None),
    };

    Classified { status, message, field_errors }
}

/// Uniform error body returned by every failing request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrors>,
}

impl ApiError {
    pub fn new(classified: Classified, path: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            status: classified.status.as_u16(),
            error: classified
                .status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            message: classified.message,
            path: path.into(),
            field_errors: classified.field_errors,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let classified = classify(&self);
        let status = classified.status;

        match &self {
            AppError::Integrity(detail) => {
                tracing::warn!(%detail, "Integrity constraint violated");
            }
            _ if status.is_server_error() => {
                tracing::error!(error = %self, "Request failed");
            }
            _ => {}
        }

        // The path is filled in by middleware::error_path, which can see the request.
        let body = ApiError::new(classified, "");
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

pub type AppResult<T> = Result<T, AppError>;
