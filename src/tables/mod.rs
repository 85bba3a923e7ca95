//! Reading and writing the delimited tables the passes exchange.
//!
//! Every reader is lenient: columns may be missing, rows may be short, and
//! invalid UTF-8 is replaced rather than rejected. Only whole-file failures
//! (missing file, I/O errors) surface as [`PlanError`].
//!
//! Writers produce a fixed header even for empty outputs and write through a
//! sibling temporary file, so a failed pass never leaves a partial table behind.

pub mod gap;
pub mod plan;
pub mod report;
pub mod sprint;

use std::fs;
use std::path::{Path, PathBuf};

use csv::{ByteRecord, StringRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PlanError;

/// Fail with [`PlanError::MissingFile`] unless `path` is an existing file.
pub fn require_file(path: &Path) -> Result<(), PlanError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PlanError::MissingFile {
            path: path.to_path_buf(),
        })
    }
}

fn lossy_record(record: &ByteRecord) -> StringRecord {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

/// Read every row of a headed table into `T`, defaulting what cannot be read.
pub(crate) fn read_rows<T>(path: &Path) -> Result<Vec<T>, PlanError>
where
    T: DeserializeOwned + Default,
{
    require_file(path)?;

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers: StringRecord = lossy_record(reader.byte_headers()?)
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (i, result) in reader.byte_records().enumerate() {
        let mut record = lossy_record(&result?);
        // Short rows are padded so that missing trailing columns read as empty.
        while record.len() < headers.len() {
            record.push_field("");
        }
        match record.deserialize::<T>(Some(&headers)) {
            Ok(row) => rows.push(row),
            Err(e) => {
                // Line numbers are 1-based and the header is line 1.
                tracing::warn!(
                    "Malformed row {} in {} kept with empty fields: {}",
                    i + 2,
                    path.display(),
                    e
                );
                rows.push(T::default());
            }
        }
    }

    Ok(rows)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `header` followed by `rows`, replacing `path` only once everything is written.
pub(crate) fn write_rows<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: &[T],
) -> Result<(), PlanError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    let written = (|| -> Result<(), PlanError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&tmp)?;
        writer.write_record(header)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_is_a_sibling() {
        let tmp = temp_path(Path::new("out/Final_Integrated_Plan.csv"));
        assert_eq!(tmp, PathBuf::from("out/Final_Integrated_Plan.csv.tmp"));
    }

    #[test]
    fn test_require_file_reports_missing_path() {
        let err = require_file(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, PlanError::MissingFile { .. }));
        assert!(err.to_string().contains("here.csv"));
    }
}
