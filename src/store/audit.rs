use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::model::{audit::AuditEntry, status::RequestStatus};
use crate::utils::csv_utils::{append_row, read_rows};

pub const AUDIT_HEADERS: [&str; 5] = ["Timestamp", "Request ID", "From", "To", "Reviewer"];

#[derive(Debug, Serialize, Deserialize)]
struct AuditRow {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Request ID")]
    request_id: String,
    #[serde(rename = "From")]
    from: String,
    #[serde(rename = "To")]
    to: String,
    #[serde(rename = "Reviewer", default)]
    reviewer: String,
}

/// Append-only log of request status changes.
pub struct AuditLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let row = AuditRow {
            timestamp: entry.timestamp.clone(),
            request_id: entry.request_id.to_string(),
            from: entry.from.to_string(),
            to: entry.to.to_string(),
            reviewer: entry.reviewer.clone(),
        };
        append_row(&self.path, &AUDIT_HEADERS, &row)
    }

    /// Entries in the order they were recorded, optionally only those of one request.
    pub fn entries(&self, request_id: Option<Uuid>) -> Result<Vec<AuditEntry>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(rows) = read_rows::<AuditRow>(&self.path)? else {
            return Ok(Vec::new());
        };

        let mut entries = Vec::with_capacity(rows.len());
        for (line, row) in rows {
            let entry = self.parse_row(line, row)?;
            if request_id.is_none_or(|id| id == entry.request_id) {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    fn parse_row(&self, line: u64, row: AuditRow) -> Result<AuditEntry, StoreError> {
        let corrupt = |reason: String| StoreError::CorruptRow {
            path: self.path.display().to_string(),
            line,
            reason,
        };
        let status = |raw: &str| {
            RequestStatus::from_str(raw.trim())
                .map_err(|_| corrupt(format!("unknown status {raw:?}")))
        };

        Ok(AuditEntry {
            request_id: Uuid::parse_str(row.request_id.trim())
                .map_err(|_| corrupt(format!("invalid Request ID {:?}", row.request_id)))?,
            from: status(&row.from)?,
            to: status(&row.to)?,
            timestamp: row.timestamp,
            reviewer: row.reviewer,
        })
    }
}
