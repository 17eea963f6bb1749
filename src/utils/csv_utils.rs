use serde::{Serialize, de::DeserializeOwned};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::errors::StoreError;

/// ===============================
/// Read all rows of a headed CSV
/// ===============================
///
/// Returns `Ok(None)` when the file does not exist. Each row comes back with
/// its record number, counting the header as record 1.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Option<Vec<(u64, T)>>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }

    let read_err = |source: csv::Error| StoreError::Read {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(read_err)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<T>().enumerate() {
        let row = result.map_err(read_err)?;
        rows.push((idx as u64 + 2, row));
    }

    Ok(Some(rows))
}

/// ===============================
/// Replace a CSV file atomically
/// ===============================
///
/// Rows are written to a temp file next to `path`, flushed, then renamed over
/// the target, so readers see either the old or the new content.
pub fn write_rows_atomic<T: Serialize>(
    path: &Path,
    headers: &[&str],
    rows: &[T],
) -> Result<(), StoreError> {
    let write_err = |source: io::Error| StoreError::StoreWrite {
        path: path.display().to_string(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(tmp.as_file());
        writer
            .write_record(headers)
            .map_err(|e| write_err(e.into()))?;
        for row in rows {
            writer.serialize(row).map_err(|e| write_err(e.into()))?;
        }
        writer.flush().map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}

/// ===============================
/// Append one row to a CSV log
/// ===============================
///
/// Creates the file with `headers` on first use.
pub fn append_row<T: Serialize>(path: &Path, headers: &[&str], row: &T) -> Result<(), StoreError> {
    let write_err = |source: io::Error| StoreError::StoreWrite {
        path: path.display().to_string(),
        source,
    };

    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(write_err)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(write_err)?;
    let is_new = file.metadata().map_err(write_err)?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if is_new {
        writer
            .write_record(headers)
            .map_err(|e| write_err(e.into()))?;
    }
    writer.serialize(row).map_err(|e| write_err(e.into()))?;
    writer.flush().map_err(write_err)?;

    Ok(())
}
