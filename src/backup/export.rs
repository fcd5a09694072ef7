use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    db::{models::ExamRecord, ExamRepository},
    log_info,
};

const ENABLE_LOGS: bool = true;

/// Backup file contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub export_date: DateTime<Utc>,
    pub exam_records: Vec<ExamRecord>,
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("exam_records_backup_{}.json", date.format("%Y%m%d"))
}

pub fn export_document(repo: &ExamRepository) -> Result<ExportDocument> {
    Ok(ExportDocument {
        export_date: repo.clock().now_utc(),
        exam_records: repo.list()?,
    })
}

/// Write `doc` as pretty JSON into `dir`, named after the local `date`.
pub fn write_export(dir: &Path, doc: &ExportDocument, date: NaiveDate) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))?;
    let path = dir.join(export_file_name(date));
    let body = serde_json::to_string_pretty(doc).context("failed to serialize export")?;
    fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))?;
    log_info!(
        "Exported {} exam records to {}",
        doc.exam_records.len(),
        path.display()
    );
    Ok(path)
}
