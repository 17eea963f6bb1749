use moka::future::Cache;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::StoreError;
use crate::model::employee::Employee;
use crate::utils::csv_utils::read_rows;

/// Column layout of `employee_data.csv`.
#[derive(Debug, Deserialize)]
struct EmployeeRow {
    #[serde(rename = "Employee ID")]
    employee_id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Department")]
    department: String,
    #[serde(rename = "Phone Number")]
    phone: String,
    #[serde(rename = "Email")]
    email: String,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            employee_id: row.employee_id.trim().to_string(),
            name: row.name,
            department: row.department,
            phone: row.phone,
            email: row.email,
        }
    }
}

/// Read-only employee roster, loaded once for the life of the process.
pub struct RosterStore {
    path: PathBuf,
    employees: OnceCell<Arc<Vec<Employee>>>,
    /// employee_id => roster entry, no expiry
    index: Cache<String, Employee>,
}

impl RosterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            employees: OnceCell::new(),
            index: Cache::builder().max_capacity(100_000).build(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full roster in file order. The file is read on the first call only; a
    /// missing file is a configuration error.
    pub fn load(&self) -> Result<Arc<Vec<Employee>>, StoreError> {
        self.employees
            .get_or_try_init(|| {
                let rows = read_rows::<EmployeeRow>(&self.path)?
                    .ok_or_else(|| StoreError::MissingRoster(self.path.display().to_string()))?;
                Ok(Arc::new(
                    rows.into_iter().map(|(_, row)| Employee::from(row)).collect(),
                ))
            })
            .cloned()
    }

    /// Exact match on the employee ID. The first roster row wins when an ID
    /// appears more than once.
    pub async fn lookup(&self, employee_id: &str) -> Result<Option<Employee>, StoreError> {
        let employee_id = employee_id.trim();
        if employee_id.is_empty() {
            return Ok(None);
        }

        if let Some(employee) = self.index.get(employee_id).await {
            return Ok(Some(employee));
        }

        let found = self
            .load()?
            .iter()
            .find(|e| e.employee_id == employee_id)
            .cloned();

        if let Some(employee) = &found {
            self.index
                .insert(employee_id.to_string(), employee.clone())
                .await;
        }

        Ok(found)
    }

    /// Load the roster and fill the lookup index in batches
    pub async fn warmup(&self, batch_size: usize) -> Result<usize, StoreError> {
        let employees = self.load()?;
        let mut seen = HashSet::with_capacity(employees.len());
        let unique: Vec<&Employee> = employees
            .iter()
            .filter(|e| seen.insert(e.employee_id.as_str()))
            .collect();

        for batch in unique.chunks(batch_size.max(1)) {
            let futures: Vec<_> = batch
                .iter()
                .map(|e| self.index.insert(e.employee_id.clone(), (*e).clone()))
                .collect();

            // Await all insertions concurrently
            futures::future::join_all(futures).await;
        }

        log::info!(
            "Roster warmup complete: {} employees from {}",
            unique.len(),
            self.path.display()
        );

        Ok(unique.len())
    }
}
