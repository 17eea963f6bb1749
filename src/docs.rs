use crate::api::admin::{
    AuditListResponse, RequestListResponse, StatusUpdatedResponse, UpdateStatus,
};
use crate::api::employee::{CreateRequest, EmployeeRequestsResponse, RequestCreatedResponse};
use crate::model::{
    audit::AuditEntry,
    employee::Employee,
    request::Request,
    status::{RequestStatus, Situation},
};
use crate::service::reporting::{
    Budget, BudgetLine, ChartBar, DailyVolume, StatusCount, Summary, SupplyDemand, TimeSeries,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Disaster Support API",
        version = "1.0.0",
        description = r#"
## Disaster Emergency Support System

Employees report their situation and ask for relief supplies during an
emergency; admins review the requests and follow demand on a dashboard.

### 🔹 Roles
- **Employee**
  - Look up roster details by Employee ID
  - Submit an emergency request (location, situation, supplies, notes)
  - View previously submitted requests
- **Admin**
  - List every request and move it between Pending, Approved, Delivered and Rejected
  - Inspect the status change history
  - Dashboard reports: status counts, supply demand, budget estimate, status chart, daily volume

### 📦 Storage
Requests live in `requests.csv`, the roster in `employee_data.csv`, status
changes in `request_audit.csv`.

---
Built with **Rust**, **Actix Web**, **csv**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::get_employee,
        crate::api::employee::create_request,
        crate::api::employee::list_own_requests,

        crate::api::admin::list_requests,
        crate::api::admin::status_options,
        crate::api::admin::update_status,
        crate::api::admin::request_audit,
        crate::api::admin::audit_log,

        crate::api::report::summary,
        crate::api::report::status_counts,
        crate::api::report::supply_demand,
        crate::api::report::budget,
        crate::api::report::status_chart,
        crate::api::report::time_series
    ),
    components(
        schemas(
            Employee,
            Request,
            Situation,
            RequestStatus,
            AuditEntry,
            CreateRequest,
            RequestCreatedResponse,
            EmployeeRequestsResponse,
            RequestListResponse,
            UpdateStatus,
            StatusUpdatedResponse,
            AuditListResponse,
            Summary,
            StatusCount,
            SupplyDemand,
            Budget,
            BudgetLine,
            ChartBar,
            DailyVolume,
            TimeSeries
        )
    ),
    tags(
        (name = "Employee", description = "Emergency request intake"),
        (name = "Admin", description = "Request review and status updates"),
        (name = "Report", description = "Dashboard aggregates"),
    )
)]
pub struct ApiDoc;
