use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;
use std::error::Error;
use uuid::Uuid;

use crate::model::status::RequestStatus;

/// Failures of the CSV-backed stores.
#[derive(Debug, Display)]
pub enum StoreError {
    #[display(fmt = "roster file {} not found", _0)]
    MissingRoster(String),

    #[display(fmt = "failed to read {}: {}", path, source)]
    Read { path: String, source: csv::Error },

    #[display(fmt = "{} line {}: {}", path, line, reason)]
    CorruptRow {
        path: String,
        line: u64,
        reason: String,
    },

    #[display(fmt = "failed to write {}: {}", path, source)]
    StoreWrite {
        path: String,
        source: std::io::Error,
    },

    #[display(fmt = "storage task was cancelled")]
    Interrupted,
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Read { source, .. } => Some(source),
            StoreError::StoreWrite { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl ResponseError for StoreError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        tracing::error!(error = %self, "Request store failure");
        HttpResponse::InternalServerError().json(json!({
            "message": "Something went wrong, Contact with system admin"
        }))
    }
}

/// Failures of the employee intake flow.
#[derive(Debug, Display)]
pub enum IntakeError {
    #[display(fmt = "Employee ID {} not found. Please check again.", _0)]
    UnknownEmployee(String),

    #[display(fmt = "Unknown supply item: {}", _0)]
    UnknownSupply(String),

    #[display(fmt = "{}", _0)]
    Store(StoreError),
}

impl Error for IntakeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            IntakeError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for IntakeError {
    fn from(e: StoreError) -> Self {
        IntakeError::Store(e)
    }
}

impl ResponseError for IntakeError {
    fn status_code(&self) -> StatusCode {
        match self {
            IntakeError::UnknownEmployee(_) => StatusCode::NOT_FOUND,
            IntakeError::UnknownSupply(_) => StatusCode::BAD_REQUEST,
            IntakeError::Store(e) => e.status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            IntakeError::Store(e) => e.error_response(),
            _ => message_response(self.status_code(), self),
        }
    }
}

/// Failures of the admin review flow.
#[derive(Debug, Display)]
pub enum ReviewError {
    #[display(fmt = "Request {} not found", _0)]
    NotFound(Uuid),

    #[display(
        fmt = "Request {} is {}, not {}; reload and try again",
        id,
        actual,
        expected
    )]
    Conflict {
        id: Uuid,
        expected: RequestStatus,
        actual: RequestStatus,
    },

    #[display(
        fmt = "Request {} is at revision {}, not {}; reload and try again",
        id,
        actual,
        expected
    )]
    StaleRevision { id: Uuid, expected: u32, actual: u32 },

    #[display(fmt = "{}", _0)]
    Store(StoreError),
}

impl Error for ReviewError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ReviewError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ReviewError {
    fn from(e: StoreError) -> Self {
        ReviewError::Store(e)
    }
}

impl ResponseError for ReviewError {
    fn status_code(&self) -> StatusCode {
        match self {
            ReviewError::NotFound(_) => StatusCode::NOT_FOUND,
            ReviewError::Conflict { .. } | ReviewError::StaleRevision { .. } => {
                StatusCode::CONFLICT
            }
            ReviewError::Store(e) => e.status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ReviewError::Store(e) => e.error_response(),
            _ => message_response(self.status_code(), self),
        }
    }
}

fn message_response(status: StatusCode, err: &dyn std::fmt::Display) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "message": err.to_string()
    }))
}
