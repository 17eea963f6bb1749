use chrono::Local;
use std::sync::Arc;
use tracing::{info, warn};

use crate::errors::IntakeError;
use crate::model::{
    employee::Employee,
    request::Request,
    status::Situation,
    supply::{Supply, dedup_supplies},
};
use crate::service::blocking;
use crate::store::{requests::RequestStore, roster::RosterStore};

/// Form fields an employee fills in.
#[derive(Debug, Clone)]
pub struct Submission {
    pub location: String,
    pub status: Situation,
    pub supplies: Vec<Supply>,
    pub notes: String,
}

/// Roster entry for `employee_id`, or `UnknownEmployee`.
pub async fn employee(roster: &RosterStore, employee_id: &str) -> Result<Employee, IntakeError> {
    match roster.lookup(employee_id).await? {
        Some(employee) => Ok(employee),
        None => {
            warn!(employee_id, "Employee ID not found in roster");
            Err(IntakeError::UnknownEmployee(employee_id.trim().to_string()))
        }
    }
}

/// Records a new `Pending` request for a rostered employee.
pub async fn submit(
    roster: &RosterStore,
    store: Arc<RequestStore>,
    employee_id: &str,
    submission: Submission,
) -> Result<Request, IntakeError> {
    let employee = employee(roster, employee_id).await?;

    if let Some(item) = submission.supplies.iter().find(|s| !s.is_known()) {
        return Err(IntakeError::UnknownSupply(item.name().to_string()));
    }

    let request = Request::new_pending(
        &employee,
        submission.location,
        submission.status,
        dedup_supplies(submission.supplies),
        submission.notes,
        Local::now().naive_local(),
    );

    let stored = request.clone();
    blocking(move || store.append(stored)).await?;

    info!(
        request_id = %request.id,
        employee_id = %request.employee_id,
        status = %request.status,
        "Emergency request submitted"
    );

    Ok(request)
}

/// The resolved employee with the requests they filed, oldest first.
pub async fn history(
    roster: &RosterStore,
    store: Arc<RequestStore>,
    employee_id: &str,
) -> Result<(Employee, Vec<Request>), IntakeError> {
    let employee = employee(roster, employee_id).await?;
    let requests = blocking(move || store.load()).await?;

    let own = requests
        .into_iter()
        .filter(|r| r.employee_id == employee.employee_id)
        .collect();
    Ok((employee, own))
}
