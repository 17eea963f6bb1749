use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::model::status::RequestStatus;

/// A single status change recorded by the review flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuditEntry {
    #[schema(example = "2026-01-01 10:00:00")]
    pub timestamp: String,

    #[schema(value_type = String, format = "uuid")]
    pub request_id: Uuid,

    pub from: RequestStatus,

    pub to: RequestStatus,

    /// Free-text name supplied by the admin, empty when not given
    #[schema(example = "ops-desk")]
    pub reviewer: String,
}
