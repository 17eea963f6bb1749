use chrono::Local;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::ReviewError;
use crate::model::{
    audit::AuditEntry,
    request::{Request, TIMESTAMP_FORMAT},
    status::RequestStatus,
};
use crate::service::blocking;
use crate::store::{
    audit::AuditLog,
    requests::{Expected, RequestStore},
};

/// An admin's status decision.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    pub status: RequestStatus,
    /// Status the admin saw when deciding; a mismatch is a conflict.
    pub expected_status: Option<RequestStatus>,
    /// Revision the admin saw; catches a status that changed and came back.
    pub expected_revision: Option<u32>,
    pub reviewer: Option<String>,
}

/// Every request in insertion order.
pub async fn list(store: Arc<RequestStore>) -> Result<Vec<Request>, ReviewError> {
    blocking(move || store.load().map_err(ReviewError::from)).await
}

/// The closed set of statuses an admin can choose from.
pub fn status_options() -> Vec<RequestStatus> {
    RequestStatus::iter().collect()
}

/// Moves request `id` to a new status. Any status may follow any other.
pub async fn transition(
    store: Arc<RequestStore>,
    audit: Arc<AuditLog>,
    id: Uuid,
    update: StatusUpdate,
) -> Result<Request, ReviewError> {
    let expected = Expected {
        status: update.expected_status,
        revision: update.expected_revision,
    };
    let change = blocking(move || store.update_status(id, update.status, expected)).await?;

    if !change.changed() {
        return Ok(change.request);
    }

    info!(
        request_id = %id,
        from = %change.previous,
        to = %change.request.request_status,
        "Request status updated"
    );

    let entry = AuditEntry {
        timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        request_id: id,
        from: change.previous,
        to: change.request.request_status,
        reviewer: update
            .reviewer
            .map(|r| r.trim().to_string())
            .unwrap_or_default(),
    };

    // the status change is already committed; a lost audit line is logged, not surfaced
    if let Err(e) = blocking(move || audit.record(&entry)).await {
        error!(error = %e, request_id = %id, "Failed to record audit entry");
    }

    Ok(change.request)
}

/// Recorded status changes, optionally for one request.
pub async fn audit_trail(
    audit: Arc<AuditLog>,
    request_id: Option<Uuid>,
) -> Result<Vec<AuditEntry>, ReviewError> {
    blocking(move || audit.entries(request_id).map_err(ReviewError::from)).await
}
