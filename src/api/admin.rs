use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::model::{audit::AuditEntry, request::Request, status::RequestStatus};
use crate::service::review::{self, StatusUpdate};
use crate::store::{audit::AuditLog, requests::RequestStore};

#[derive(Serialize, ToSchema)]
pub struct RequestListResponse {
    pub data: Vec<Request>,
    #[schema(example = 1)]
    pub total: usize,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateStatus {
    #[schema(example = "Approved")]
    pub status: RequestStatus,
    /// Status shown to the admin when the decision was made. When it no
    /// longer matches, the update is refused with 409.
    #[schema(example = "Pending")]
    pub expected_status: Option<RequestStatus>,
    /// Revision shown to the admin. Refused with 409 when the request has
    /// changed since, even if its status came back to the same value.
    #[schema(example = 0)]
    pub expected_revision: Option<u32>,
    #[schema(example = "ops-desk")]
    pub reviewer: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct StatusUpdatedResponse {
    #[schema(example = "Request status updated.")]
    pub message: String,
    pub request: Request,
}

#[derive(Serialize, ToSchema)]
pub struct AuditListResponse {
    pub data: Vec<AuditEntry>,
    #[schema(example = 1)]
    pub total: usize,
}

/// All requests in submission order
#[utoipa::path(
    get,
    path = "/api/admin/requests",
    responses(
        (status = 200, description = "Every stored request", body = RequestListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn list_requests(store: web::Data<RequestStore>) -> actix_web::Result<impl Responder> {
    let data = review::list(store.into_inner()).await?;

    Ok(HttpResponse::Ok().json(RequestListResponse {
        total: data.len(),
        data,
    }))
}

/// Statuses an admin can assign
#[utoipa::path(
    get,
    path = "/api/admin/requests/statuses",
    responses(
        (status = 200, description = "Closed status list", body = Vec<RequestStatus>)
    ),
    tag = "Admin"
)]
pub async fn status_options() -> impl Responder {
    HttpResponse::Ok().json(review::status_options())
}

/// Change the status of one request
#[utoipa::path(
    put,
    path = "/api/admin/requests/{request_id}/status",
    params(
        ("request_id" = String, Path, description = "Stable request ID (UUID)")
    ),
    request_body = UpdateStatus,
    responses(
        (status = 200, description = "Status updated", body = StatusUpdatedResponse),
        (status = 404, description = "Request not found", body = Object, example = json!({
            "message": "Request 7f9c24e8-3b12-4d8a-9a51-0c2b1e6d4f10 not found"
        })),
        (status = 409, description = "Request changed since it was loaded", body = Object),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn update_status(
    store: web::Data<RequestStore>,
    audit: web::Data<AuditLog>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatus>,
) -> actix_web::Result<impl Responder> {
    let request_id = path.into_inner();
    let body = body.into_inner();

    let request = review::transition(
        store.into_inner(),
        audit.into_inner(),
        request_id,
        StatusUpdate {
            status: body.status,
            expected_status: body.expected_status,
            expected_revision: body.expected_revision,
            reviewer: body.reviewer,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(StatusUpdatedResponse {
        message: "Request status updated.".to_string(),
        request,
    }))
}

/// Status history of one request
#[utoipa::path(
    get,
    path = "/api/admin/requests/{request_id}/audit",
    params(
        ("request_id" = String, Path, description = "Stable request ID (UUID)")
    ),
    responses(
        (status = 200, description = "Recorded status changes", body = AuditListResponse)
    ),
    tag = "Admin"
)]
pub async fn request_audit(
    audit: web::Data<AuditLog>,
    path: web::Path<Uuid>,
) -> actix_web::Result<impl Responder> {
    let data = review::audit_trail(audit.into_inner(), Some(path.into_inner())).await?;

    Ok(HttpResponse::Ok().json(AuditListResponse {
        total: data.len(),
        data,
    }))
}

/// Every recorded status change
#[utoipa::path(
    get,
    path = "/api/admin/audit",
    responses(
        (status = 200, description = "Recorded status changes", body = AuditListResponse)
    ),
    tag = "Admin"
)]
pub async fn audit_log(audit: web::Data<AuditLog>) -> actix_web::Result<impl Responder> {
    let data = review::audit_trail(audit.into_inner(), None).await?;

    Ok(HttpResponse::Ok().json(AuditListResponse {
        total: data.len(),
        data,
    }))
}
