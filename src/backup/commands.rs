//! Backup commands: export to the configured directory, two-phase import.

use std::{fs, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{export_document, import_backup, write_export, ImportOutcome, ImportPlan};
use crate::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub path: PathBuf,
    pub record_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    pub record_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_date: Option<DateTime<Utc>>,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub applied: bool,
    pub record_count: usize,
}

pub fn export_backup(state: &AppState) -> Result<ExportResult, String> {
    let doc = export_document(&state.exams).map_err(|e| e.to_string())?;
    let dir = state.settings.export_dir().map_err(|e| e.to_string())?;
    let today = state.exams.clock().now_local().date();
    let path = write_export(&dir, &doc, today).map_err(|e| e.to_string())?;
    Ok(ExportResult {
        path,
        record_count: doc.exam_records.len(),
    })
}

/// Validate a backup without touching stored data.
pub fn preview_import(state: &AppState, text: &str) -> Result<ImportPreview, String> {
    let plan = ImportPlan::parse(text, state.exams.clock().now_utc()).map_err(|e| e.to_string())?;
    Ok(ImportPreview {
        record_count: plan.record_count(),
        export_date: plan.export_date,
        prompt: plan.confirmation_prompt(),
    })
}

/// Replace the collection with the backup when `confirmed`.
pub fn apply_import(state: &AppState, text: &str, confirmed: bool) -> Result<ImportResult, String> {
    let outcome = import_backup(&state.exams, text, |_| confirmed).map_err(|e| e.to_string())?;
    Ok(match outcome {
        ImportOutcome::Applied(count) => ImportResult {
            applied: true,
            record_count: count,
        },
        ImportOutcome::Cancelled => ImportResult {
            applied: false,
            record_count: 0,
        },
    })
}

pub fn read_backup_file(path: &str) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("failed to read {path}: {e}"))
}
