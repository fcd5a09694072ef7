//! View commands. Each reads the collection once and projects it against the
//! clock's local time.

use chrono::Datelike;
use serde::Serialize;

use super::{
    calendar::{calendar_month, CalendarMonth},
    detail::{exam_detail, ExamDetail},
    feed::{chronological_feed, FeedItem},
    status::ExamStatus,
    summary::{dashboard, Dashboard},
    table::{available_statuses, exam_table, TableQuery, TableRow},
};
use crate::{db::models::ExamId, AppState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamTable {
    pub rows: Vec<TableRow>,
    /// Statuses present in the whole collection, for the filter menu.
    pub available_statuses: Vec<ExamStatus>,
}

pub fn get_dashboard(state: &AppState) -> Result<Dashboard, String> {
    let records = state.exams.list().map_err(|e| e.to_string())?;
    Ok(dashboard(&records, state.exams.clock().now_local()))
}

pub fn get_feed(state: &AppState) -> Result<Vec<FeedItem>, String> {
    let records = state.exams.list().map_err(|e| e.to_string())?;
    Ok(chronological_feed(&records))
}

pub fn get_exam_table(state: &AppState, query: TableQuery) -> Result<ExamTable, String> {
    let records = state.exams.list().map_err(|e| e.to_string())?;
    let now = state.exams.clock().now_local();
    Ok(ExamTable {
        rows: exam_table(&records, &query, now),
        available_statuses: available_statuses(&records, now),
    })
}

/// Month grid; defaults to the current month.
pub fn get_calendar(
    state: &AppState,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<CalendarMonth, String> {
    let records = state.exams.list().map_err(|e| e.to_string())?;
    let today = state.exams.clock().now_local().date();
    let year = year.unwrap_or_else(|| today.year());
    let month = month.unwrap_or_else(|| today.month());
    calendar_month(&records, year, month, today)
        .ok_or_else(|| format!("invalid calendar month {year}-{month}"))
}

pub fn get_exam_detail(state: &AppState, exam_id: ExamId) -> Result<Option<ExamDetail>, String> {
    let record = state.exams.get_by_id(exam_id).map_err(|e| e.to_string())?;
    let now = state.exams.clock().now_local();
    Ok(record.map(|record| exam_detail(&record, now)))
}
