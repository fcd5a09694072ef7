use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::{
    db::{
        models::{validation::validate_collection, ExamRecord},
        ExamRepository,
    },
    log_info, log_warn,
};

const ENABLE_LOGS: bool = true;

/// A backup file that passed every check and is ready to replace the
/// stored collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPlan {
    pub export_date: Option<DateTime<Utc>>,
    pub records: Vec<ExamRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Applied(usize),
    Cancelled,
}

impl ImportPlan {
    /// Validate a backup file. Nothing is written here.
    ///
    /// Records missing `id`, `createdAt` or `updatedAt` (hand-written or very
    /// old files) get values derived from `now`.
    pub fn parse(text: &str, now: DateTime<Utc>) -> Result<Self> {
        let document: Value = serde_json::from_str(text).context("backup file is not valid JSON")?;
        let Some(items) = document.get("examRecords") else {
            bail!("examRecords is missing");
        };
        let Value::Array(items) = items else {
            bail!("examRecords must be an array");
        };

        let stamp = Value::String(now.to_rfc3339());
        let mut next_id = now.timestamp_millis();
        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let Value::Object(fields) = item else {
                bail!("examRecords[{index}] must be an object");
            };
            check_required(fields, index)?;

            let mut fields = fields.clone();
            if fields.get("id").map_or(true, Value::is_null) {
                fields.insert("id".into(), Value::from(next_id));
                next_id += 1;
            }
            for key in ["createdAt", "updatedAt"] {
                if fields.get(key).map_or(true, Value::is_null) {
                    fields.insert(key.into(), stamp.clone());
                }
            }
            let record: ExamRecord = serde_json::from_value(Value::Object(fields))
                .with_context(|| format!("examRecords[{index}] is not a valid exam record"))?;
            records.push(record);
        }
        validate_collection(&records)?;

        Ok(Self {
            export_date: read_export_date(&document),
            records,
        })
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Question put to the user before the destructive replace.
    pub fn confirmation_prompt(&self) -> String {
        format!(
            "Import {} exam records? This replaces all existing data.",
            self.record_count()
        )
    }
}

/// Validate `text` and, if `confirm` accepts the plan, replace the whole
/// collection with it. Invalid files are rejected before `confirm` is asked.
pub fn import_backup(
    repo: &ExamRepository,
    text: &str,
    confirm: impl FnOnce(&ImportPlan) -> bool,
) -> Result<ImportOutcome> {
    let plan = ImportPlan::parse(text, repo.clock().now_utc())?;
    if !confirm(&plan) {
        log_info!("Import of {} exam records cancelled", plan.record_count());
        return Ok(ImportOutcome::Cancelled);
    }
    let count = repo.replace_all(plan.records)?;
    log_info!("Imported {} exam records", count);
    Ok(ImportOutcome::Applied(count))
}

/// `exportDate` is informational; a missing or unreadable value is dropped.
fn read_export_date(document: &Value) -> Option<DateTime<Utc>> {
    let raw = document.get("exportDate").and_then(Value::as_str)?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(err) => {
            log_warn!("Ignoring unreadable exportDate '{raw}': {err}");
            None
        }
    }
}

fn check_required(fields: &Map<String, Value>, index: usize) -> Result<()> {
    let has_name = fields
        .get("examName")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.trim().is_empty());
    let has_nodes = fields.get("timeNodes").is_some_and(|nodes| !nodes.is_null());
    if !has_name || !has_nodes {
        bail!("examRecords[{index}] is incomplete: examName and timeNodes are required");
    }
    Ok(())
}
