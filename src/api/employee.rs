use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{
    employee::Employee,
    request::Request,
    status::Situation,
    supply::Supply,
};
use crate::service::intake::{self, Submission};
use crate::store::{requests::RequestStore, roster::RosterStore};

#[derive(Deserialize, ToSchema)]
pub struct CreateRequest {
    #[schema(example = "HQ, Level 3")]
    /// Where the employee is right now
    #[serde(default)]
    pub location: String,
    #[schema(example = "Evacuated")]
    pub status: Situation,
    #[schema(value_type = Vec<String>, example = json!(["Water", "Food"]))]
    /// Any of: Food, Water, Baby Supplies, Hygiene Kit, Medical Kit, Blanket
    #[serde(default)]
    pub supplies: Vec<Supply>,
    #[schema(example = "Two children with me")]
    #[serde(default)]
    pub notes: String,
}

#[derive(Serialize, ToSchema)]
pub struct RequestCreatedResponse {
    #[schema(example = "Your request has been submitted.")]
    pub message: String,
    pub request: Request,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeRequestsResponse {
    pub employee: Employee,
    pub data: Vec<Request>,
    #[schema(example = 1)]
    pub total: usize,
}

/// Employee information for the intake form
#[utoipa::path(
    get,
    path = "/api/employee/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Roster employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee ID E404 not found. Please check again."
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    roster: web::Data<RosterStore>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee = intake::employee(&roster, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Submit an emergency request
#[utoipa::path(
    post,
    path = "/api/employee/{employee_id}/requests",
    params(
        ("employee_id" = String, Path, description = "Roster employee ID")
    ),
    request_body(
        content = CreateRequest,
        description = "Emergency request form",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Request recorded as Pending", body = RequestCreatedResponse),
        (status = 400, description = "Invalid form", body = Object, example = json!({
            "message": "Unknown supply item: Tent"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee ID E404 not found. Please check again."
        })),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "message": "Something went wrong, Contact with system admin"
        }))
    ),
    tag = "Employee"
)]
pub async fn create_request(
    roster: web::Data<RosterStore>,
    store: web::Data<RequestStore>,
    path: web::Path<String>,
    payload: web::Json<CreateRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let form = payload.into_inner();

    let request = intake::submit(
        &roster,
        store.into_inner(),
        &employee_id,
        Submission {
            location: form.location,
            status: form.status,
            supplies: form.supplies,
            notes: form.notes,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(RequestCreatedResponse {
        message: "Your request has been submitted.".to_string(),
        request,
    }))
}

/// Requests previously filed by the employee
#[utoipa::path(
    get,
    path = "/api/employee/{employee_id}/requests",
    params(
        ("employee_id" = String, Path, description = "Roster employee ID")
    ),
    responses(
        (status = 200, description = "Previous requests, oldest first", body = EmployeeRequestsResponse),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn list_own_requests(
    roster: web::Data<RosterStore>,
    store: web::Data<RequestStore>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let (employee, data) = intake::history(&roster, store.into_inner(), &employee_id).await?;

    Ok(HttpResponse::Ok().json(EmployeeRequestsResponse {
        employee,
        total: data.len(),
        data,
    }))
}
