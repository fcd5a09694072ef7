//! Month calendar: which nodes fall on which day.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::db::{
    helpers::parse_node_time,
    models::{ExamId, ExamRecord, ExamType, NodeKind, TimeNode},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub exam_id: ExamId,
    pub node: TimeNode,
    pub priority: u8,
}

/// Occurrences of one exam (by name) on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarGroup {
    pub exam_name: String,
    pub exam_type: ExamType,
    pub color_token: &'static str,
    pub entries: Vec<CalendarEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_today: bool,
    pub groups: Vec<CalendarGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

/// Every date of the month, or `None` for an invalid year/month.
pub fn month_days(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    Some(first.iter_days().take_while(|day| *day < next).collect())
}

/// Move `delta` months from `(year, month)` (previous / next month buttons).
pub fn shift_month(year: i32, month: u32, delta: i32) -> Option<(i32, u32)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let moved = if delta >= 0 {
        first.checked_add_months(Months::new(delta.unsigned_abs()))?
    } else {
        first.checked_sub_months(Months::new(delta.unsigned_abs()))?
    };
    Some((moved.year(), moved.month()))
}

pub fn calendar_month(
    records: &[ExamRecord],
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Option<CalendarMonth> {
    let days = month_days(year, month)?
        .into_iter()
        .map(|date| CalendarDay {
            date,
            is_today: date == today,
            groups: occurrences_on(records, date),
        })
        .collect();
    Some(CalendarMonth { year, month, days })
}

/// Nodes overlapping `day`, grouped by exam name (groups in name order) and
/// ordered inside a group by default-node priority, then input order.
pub fn occurrences_on(records: &[ExamRecord], day: NaiveDate) -> Vec<CalendarGroup> {
    let mut hits: Vec<(&ExamRecord, &TimeNode)> = records
        .iter()
        .flat_map(|record| record.time_nodes.iter().map(move |node| (record, node)))
        .filter(|(_, node)| occurs_on(node, day))
        .collect();
    hits.sort_by(|(a_exam, a_node), (b_exam, b_node)| {
        a_exam
            .exam_name
            .cmp(&b_exam.exam_name)
            .then_with(|| a_node.calendar_priority().cmp(&b_node.calendar_priority()))
    });

    let mut groups: Vec<CalendarGroup> = Vec::new();
    for (record, node) in hits {
        let entry = CalendarEntry {
            exam_id: record.id,
            node: node.clone(),
            priority: node.calendar_priority(),
        };
        match groups.last_mut() {
            Some(group) if group.exam_name == record.exam_name => group.entries.push(entry),
            _ => groups.push(CalendarGroup {
                exam_name: record.exam_name.clone(),
                exam_type: record.exam_type,
                color_token: record.exam_type.color_token(),
                entries: vec![entry],
            }),
        }
    }
    groups
}

/// Single nodes match their start date; ranges match every date from start
/// to end inclusive. Nodes with unreadable dates never match.
pub fn occurs_on(node: &TimeNode, day: NaiveDate) -> bool {
    let Some(start) = parse_node_time(node.start_time()).date() else {
        return false;
    };
    match node.kind() {
        NodeKind::Single => start == day,
        NodeKind::Range => match parse_node_time(node.end_time()).date() {
            Some(end) => start <= day && day <= end,
            None => false,
        },
    }
}
