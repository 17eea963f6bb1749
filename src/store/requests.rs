use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{ReviewError, StoreError};
use crate::model::{
    request::Request,
    status::{RequestStatus, Situation},
    supply::{join_supplies, split_supplies},
};
use crate::utils::csv_utils::{read_rows, write_rows_atomic};

/// Column order of `requests.csv`. The first eleven columns keep the legacy
/// layout; `Request ID` and `Revision` are appended.
pub const REQUEST_HEADERS: [&str; 13] = [
    "Timestamp",
    "Employee ID",
    "Name",
    "Department",
    "Phone Number",
    "Email",
    "Location",
    "Status",
    "Supplies Needed",
    "Additional Notes",
    "Request Status",
    "Request ID",
    "Revision",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RequestRow {
    #[serde(rename = "Timestamp")]
    timestamp: String,
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
    #[serde(rename = "Location")]
    location: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Supplies Needed")]
    supplies_needed: String,
    #[serde(rename = "Additional Notes")]
    notes: String,
    #[serde(rename = "Request Status")]
    request_status: String,
    /// absent in files written before stable IDs existed
    #[serde(rename = "Request ID", default)]
    request_id: String,
    #[serde(rename = "Revision", default)]
    revision: String,
}

impl From<&Request> for RequestRow {
    fn from(req: &Request) -> Self {
        RequestRow {
            timestamp: req.timestamp.clone(),
            employee_id: req.employee_id.clone(),
            name: req.name.clone(),
            department: req.department.clone(),
            phone: req.phone.clone(),
            email: req.email.clone(),
            location: req.location.clone(),
            status: req.status.to_string(),
            supplies_needed: join_supplies(&req.supplies_needed),
            notes: req.notes.clone(),
            request_status: req.request_status.to_string(),
            request_id: req.id.to_string(),
            revision: req.revision.to_string(),
        }
    }
}

impl RequestRow {
    fn id(&self) -> Option<Uuid> {
        Uuid::parse_str(self.request_id.trim()).ok()
    }

    fn into_request(self, path: &Path, line: u64) -> Result<Request, StoreError> {
        let corrupt = |reason: String| StoreError::CorruptRow {
            path: path.display().to_string(),
            line,
            reason,
        };

        let id = self
            .id()
            .ok_or_else(|| corrupt(format!("invalid Request ID {:?}", self.request_id)))?;
        let status = Situation::from_str(self.status.trim())
            .map_err(|_| corrupt(format!("unknown Status {:?}", self.status)))?;
        let request_status = RequestStatus::from_str(self.request_status.trim())
            .map_err(|_| corrupt(format!("unknown Request Status {:?}", self.request_status)))?;
        let revision: u32 = match self.revision.trim() {
            "" => 0,
            raw => raw
                .parse()
                .map_err(|_| corrupt(format!("invalid Revision {raw:?}")))?,
        };

        Ok(Request {
            id,
            timestamp: self.timestamp,
            employee_id: self.employee_id,
            name: self.name,
            department: self.department,
            phone: self.phone,
            email: self.email,
            location: self.location,
            status,
            supplies_needed: split_supplies(&self.supplies_needed),
            notes: self.notes,
            request_status,
            revision,
        })
    }
}

/// What the caller saw before deciding. Any field given must still match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expected {
    pub status: Option<RequestStatus>,
    pub revision: Option<u32>,
}

impl Expected {
    pub fn status(status: RequestStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn revision(revision: u32) -> Self {
        Self {
            revision: Some(revision),
            ..Self::default()
        }
    }
}

/// Result of a status update.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub request: Request,
    pub previous: RequestStatus,
}

impl StatusChange {
    pub fn changed(&self) -> bool {
        self.previous != self.request.request_status
    }
}

/// CSV-backed request collection.
///
/// Every call re-reads the file. All reads and writes are serialized through
/// one lock, and every rewrite replaces the file atomically. Writes only
/// parse the row they touch; other rows are carried over as stored.
pub struct RequestStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RequestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current requests in insertion order; empty when the file does not exist yet.
    pub fn load(&self) -> Result<Vec<Request>, StoreError> {
        let _guard = self.guard();
        self.rows_locked()?
            .into_iter()
            .map(|(line, row)| row.into_request(&self.path, line))
            .collect()
    }

    pub fn append(&self, request: Request) -> Result<(), StoreError> {
        let _guard = self.guard();
        let mut rows = self.rows_locked()?;
        let line = rows.len() as u64 + 2;
        rows.push((line, RequestRow::from(&request)));
        self.write_locked(&rows)?;
        debug!(path = %self.path.display(), total = rows.len(), "Request appended");
        Ok(())
    }

    /// Sets `request_status` on the record with `id`.
    ///
    /// When `expected` names a status or revision the record no longer has,
    /// nothing is written and a conflict is returned. Setting the status a
    /// record already has is a no-op; any other change bumps the revision.
    pub fn update_status(
        &self,
        id: Uuid,
        new_status: RequestStatus,
        expected: Expected,
    ) -> Result<StatusChange, ReviewError> {
        let _guard = self.guard();
        let mut rows = self.rows_locked()?;

        let (line, row) = rows
            .iter_mut()
            .find(|(_, row)| row.id() == Some(id))
            .ok_or(ReviewError::NotFound(id))?;
        let mut request = row.clone().into_request(&self.path, *line)?;

        let previous = request.request_status;
        if let Some(expected) = expected.status {
            if expected != previous {
                return Err(ReviewError::Conflict {
                    id,
                    expected,
                    actual: previous,
                });
            }
        }
        if let Some(expected) = expected.revision {
            if expected != request.revision {
                return Err(ReviewError::StaleRevision {
                    id,
                    expected,
                    actual: request.revision,
                });
            }
        }

        if previous == new_status {
            return Ok(StatusChange { request, previous });
        }

        request.request_status = new_status;
        request.revision += 1;
        *row = RequestRow::from(&request);
        self.write_locked(&rows)?;

        Ok(StatusChange { request, previous })
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // the guarded data is `()`, a poisoned lock carries no broken state
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stored rows with their record numbers. Rows without an ID get one,
    /// and the file is rewritten once to keep it.
    fn rows_locked(&self) -> Result<Vec<(u64, RequestRow)>, StoreError> {
        let Some(mut rows) = read_rows::<RequestRow>(&self.path)? else {
            return Ok(Vec::new());
        };

        let mut assigned = 0usize;
        for (_, row) in rows.iter_mut() {
            if row.request_id.trim().is_empty() {
                row.request_id = Uuid::new_v4().to_string();
                assigned += 1;
            }
        }

        if assigned > 0 {
            info!(
                path = %self.path.display(),
                assigned,
                "Assigned request IDs to legacy rows"
            );
            self.write_locked(&rows)?;
        }

        Ok(rows)
    }

    fn write_locked(&self, rows: &[(u64, RequestRow)]) -> Result<(), StoreError> {
        let rows: Vec<&RequestRow> = rows.iter().map(|(_, row)| row).collect();
        write_rows_atomic(&self.path, &REQUEST_HEADERS, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{employee::Employee, supply::Supply};
    use chrono::NaiveDate;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn alice() -> Employee {
        Employee {
            employee_id: "E001".into(),
            name: "Alice".into(),
            department: "Ops".into(),
            phone: "555-1111".into(),
            email: "a@x.com".into(),
        }
    }

    fn request(location: &str, supplies: Vec<Supply>, notes: &str) -> Request {
        let at = NaiveDate::from_ymd_opt(2026, 2, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Request::new_pending(
            &alice(),
            location.into(),
            Situation::InNeedOfHelp,
            supplies,
            notes.into(),
            at,
        )
    }

    fn store_in(dir: &TempDir) -> RequestStore {
        RequestStore::new(dir.path().join("requests.csv"))
    }

    #[test]
    fn missing_file_is_an_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn reload_returns_identical_requests() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let written = vec![
            request("HQ", vec![Supply::Food, Supply::Water], "urgent"),
            request("Depot, Bay 2", vec![], "needs \"help\"\nasap"),
            request("Clinic", vec![Supply::BabySupplies, Supply::MedicalKit], ""),
        ];
        for r in &written {
            store.append(r.clone()).unwrap();
        }

        assert_eq!(store.load().unwrap(), written);
    }

    #[test]
    fn file_keeps_legacy_column_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let req = request("HQ", vec![Supply::Water, Supply::Food], "urgent");
        store.append(req.clone()).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), REQUEST_HEADERS.join(","));
        assert_eq!(
            lines.next().unwrap(),
            format!(
                "2026-02-01 12:00:00,E001,Alice,Ops,555-1111,a@x.com,HQ,In Need of Help,\"Water, Food\",urgent,Pending,{},0",
                req.id
            )
        );
    }

    #[test]
    fn update_status_by_id() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let first = request("A", vec![], "");
        let second = request("B", vec![], "");
        store.append(first.clone()).unwrap();
        store.append(second.clone()).unwrap();

        let change = store
            .update_status(second.id, RequestStatus::Approved, Expected::default())
            .unwrap();
        assert!(change.changed());
        assert_eq!(change.previous, RequestStatus::Pending);

        let loaded = store.load().unwrap();
        assert_eq!(loaded[0].request_status, RequestStatus::Pending);
        assert_eq!(loaded[1].request_status, RequestStatus::Approved);
    }

    #[test]
    fn update_status_survives_new_arrivals() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let target = request("A", vec![], "");
        store.append(target.clone()).unwrap();
        store.append(request("B", vec![], "")).unwrap();

        store
            .update_status(
                target.id,
                RequestStatus::Delivered,
                Expected::status(RequestStatus::Pending),
            )
            .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded[0].id, target.id);
        assert_eq!(loaded[0].request_status, RequestStatus::Delivered);
        assert_eq!(loaded[1].request_status, RequestStatus::Pending);
    }

    #[test]
    fn stale_expected_status_is_a_conflict() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let req = request("A", vec![], "");
        store.append(req.clone()).unwrap();
        store
            .update_status(req.id, RequestStatus::Approved, Expected::default())
            .unwrap();

        let err = store
            .update_status(
                req.id,
                RequestStatus::Rejected,
                Expected::status(RequestStatus::Pending),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ReviewError::Conflict {
                actual: RequestStatus::Approved,
                ..
            }
        ));
        assert_eq!(
            store.load().unwrap()[0].request_status,
            RequestStatus::Approved
        );
    }

    #[test]
    fn unknown_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(request("A", vec![], "")).unwrap();
        let missing = Uuid::new_v4();
        assert!(matches!(
            store.update_status(missing, RequestStatus::Approved, Expected::default()),
            Err(ReviewError::NotFound(id)) if id == missing
        ));
    }

    #[test]
    fn legacy_rows_get_stable_ids() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            "Timestamp,Employee ID,Name,Department,Phone Number,Email,Location,Status,Supplies Needed,Additional Notes,Request Status\n\
             2025-12-01 08:00:00,E001,Alice,Ops,555-1111,a@x.com,HQ,Safe,\"Food, Tent\",,Delivered\n",
        )
        .unwrap();

        let first = store.load().unwrap();
        let second = store.load().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, second[0].id);
        assert_eq!(
            first[0].supplies_needed,
            vec![Supply::Food, Supply::Other("Tent".into())]
        );
        assert_eq!(first[0].request_status, RequestStatus::Delivered);
        assert!(std::fs::read_to_string(store.path())
            .unwrap()
            .starts_with(&REQUEST_HEADERS.join(",")));
    }

    #[test]
    fn unknown_request_status_is_reported_with_line() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            "Timestamp,Employee ID,Name,Department,Phone Number,Email,Location,Status,Supplies Needed,Additional Notes,Request Status\n\
             2025-12-01 08:00:00,E001,Alice,Ops,555-1111,a@x.com,HQ,Safe,,,Lost\n",
        )
        .unwrap();

        match store.load() {
            Err(StoreError::CorruptRow { line, reason, .. }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("Lost"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn writes_carry_unparsed_rows_over() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            "Timestamp,Employee ID,Name,Department,Phone Number,Email,Location,Status,Supplies Needed,Additional Notes,Request Status\n\
             2025-12-01 08:00:00,E002,Bob,Finance,555-2222,b@x.com,Depot,Safe,,,approved\n",
        )
        .unwrap();

        let fresh = request("HQ", vec![Supply::Water], "");
        store.append(fresh.clone()).unwrap();
        store
            .update_status(fresh.id, RequestStatus::Approved, Expected::default())
            .unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][10], "approved");
        assert_eq!(&records[1][10], "Approved");
        assert_eq!(&records[1][11], fresh.id.to_string());

        assert!(matches!(
            store.load(),
            Err(StoreError::CorruptRow { line: 2, .. })
        ));
    }

    #[test]
    fn revision_catches_a_status_that_came_back() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let req = request("A", vec![], "");
        store.append(req.clone()).unwrap();
        let seen = store.load().unwrap()[0].clone();
        assert_eq!(seen.revision, 0);

        store
            .update_status(req.id, RequestStatus::Approved, Expected::default())
            .unwrap();
        let back = store
            .update_status(req.id, RequestStatus::Pending, Expected::default())
            .unwrap();
        assert_eq!(back.request.revision, 2);

        let stale = Expected {
            status: Some(seen.request_status),
            revision: Some(seen.revision),
        };
        let err = store
            .update_status(req.id, RequestStatus::Rejected, stale)
            .unwrap_err();
        assert!(matches!(
            err,
            ReviewError::StaleRevision {
                expected: 0,
                actual: 2,
                ..
            }
        ));
        assert_eq!(
            store.load().unwrap()[0].request_status,
            RequestStatus::Pending
        );
    }

    #[test]
    fn noop_update_keeps_the_revision() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let req = request("A", vec![], "");
        store.append(req.clone()).unwrap();

        let change = store
            .update_status(req.id, RequestStatus::Pending, Expected::revision(0))
            .unwrap();
        assert!(!change.changed());
        assert_eq!(store.load().unwrap()[0].revision, 0);
    }

    #[test]
    fn concurrent_appends_are_all_kept() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let written: Vec<Request> = (0..16)
            .map(|i| request(&format!("site {i}"), vec![Supply::Food], ""))
            .collect();

        std::thread::scope(|s| {
            let store = &store;
            for r in &written {
                s.spawn(move || store.append(r.clone()).unwrap());
            }
        });

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), written.len());
        let ids: HashSet<Uuid> = loaded.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), written.len());
        assert!(written.iter().all(|r| ids.contains(&r.id)));
    }

    #[test]
    fn status_update_racing_appends_loses_nothing() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let target = request("target", vec![], "");
        store.append(target.clone()).unwrap();
        let target_id = target.id;
        let arrivals: Vec<Request> = (0..12)
            .map(|i| request(&format!("site {i}"), vec![], ""))
            .collect();

        std::thread::scope(|s| {
            let store = &store;
            for r in &arrivals {
                s.spawn(move || store.append(r.clone()).unwrap());
            }
            s.spawn(move || {
                store
                    .update_status(
                        target_id,
                        RequestStatus::Approved,
                        Expected::status(RequestStatus::Pending),
                    )
                    .unwrap()
            });
        });

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), arrivals.len() + 1);
        assert_eq!(loaded[0].id, target_id);
        assert_eq!(loaded[0].request_status, RequestStatus::Approved);
        assert_eq!(loaded[0].revision, 1);
        let ids: HashSet<Uuid> = loaded.iter().map(|r| r.id).collect();
        assert!(arrivals.iter().all(|r| ids.contains(&r.id)));
        assert!(loaded[1..]
            .iter()
            .all(|r| r.request_status == RequestStatus::Pending));
    }
}
