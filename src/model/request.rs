use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::model::{
    employee::Employee,
    status::{RequestStatus, Situation},
    supply::Supply,
};

/// Format written to the `Timestamp` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One emergency request, with the employee's contact details copied in at
/// submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[schema(example = json!({
    "id": "7f9c24e8-3b12-4d8a-9a51-0c2b1e6d4f10",
    "timestamp": "2026-01-01 09:30:00",
    "employee_id": "E001",
    "name": "Alice",
    "department": "Ops",
    "phone": "555-1111",
    "email": "a@x.com",
    "location": "HQ",
    "status": "Evacuated",
    "supplies_needed": ["Water", "Food"],
    "notes": "urgent",
    "request_status": "Pending",
    "revision": 0
}))]
pub struct Request {
    #[schema(value_type = String, format = "uuid")]
    pub id: Uuid,
    /// Submission time as stored; kept verbatim so hand-edited files survive.
    #[schema(example = "2026-01-01 09:30:00")]
    pub timestamp: String,
    pub employee_id: String,
    pub name: String,
    pub department: String,
    pub phone: String,
    pub email: String,
    pub location: String,
    pub status: Situation,
    #[schema(value_type = Vec<String>, example = json!(["Water", "Food"]))]
    pub supplies_needed: Vec<Supply>,
    pub notes: String,
    pub request_status: RequestStatus,
    /// Bumped on every effective status change.
    #[schema(example = 0)]
    pub revision: u32,
}

impl Request {
    pub fn new_pending(
        employee: &Employee,
        location: String,
        status: Situation,
        supplies_needed: Vec<Supply>,
        notes: String,
        submitted_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: submitted_at.format(TIMESTAMP_FORMAT).to_string(),
            employee_id: employee.employee_id.clone(),
            name: employee.name.clone(),
            department: employee.department.clone(),
            phone: employee.phone.clone(),
            email: employee.email.clone(),
            location,
            status,
            supplies_needed,
            notes,
            request_status: RequestStatus::Pending,
            revision: 0,
        }
    }

    pub fn submitted_at(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }

    pub fn submitted_on(&self) -> Option<NaiveDate> {
        self.submitted_at().map(|at| at.date())
    }
}

/// Lenient timestamp parsing: the canonical column format, ISO-8601 with or
/// without offset, or a bare date (midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for format in [TIMESTAMP_FORMAT, "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(at);
        }
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.naive_local());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
