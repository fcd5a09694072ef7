//! Management table: filter, sort and per-row projections.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{
    feed::start_key,
    status::{exam_status, node_countdown, Countdown, ExamStatus},
};
use crate::db::{
    helpers::parse_node_time,
    models::{DefaultNode, ExamRecord, ExamType, TimeNode},
};

const ALL: &str = "all";

fn is_all(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == ALL
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeFilter {
    #[default]
    All,
    Only(ExamType),
}

impl TypeFilter {
    pub fn matches(&self, record: &ExamRecord) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(kind) => record.exam_type == *kind,
        }
    }
}

impl TryFrom<String> for TypeFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_all(&value) {
            return Ok(TypeFilter::All);
        }
        ExamType::from_wire(&value)
            .map(TypeFilter::Only)
            .ok_or_else(|| format!("unknown exam type filter '{value}'"))
    }
}

impl From<TypeFilter> for String {
    fn from(filter: TypeFilter) -> Self {
        match filter {
            TypeFilter::All => ALL.to_string(),
            TypeFilter::Only(kind) => kind.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(ExamStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: ExamStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => status == *wanted,
        }
    }
}

impl TryFrom<String> for StatusFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_all(&value) {
            return Ok(StatusFilter::All);
        }
        ExamStatus::parse(&value)
            .map(StatusFilter::Only)
            .ok_or_else(|| format!("unknown status filter '{value}'"))
    }
}

impl From<StatusFilter> for String {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::All => ALL.to_string(),
            StatusFilter::Only(status) => status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    ExamName,
    NextNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortConfig {
    pub key: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortConfig {
    /// Clicking a header: the active key flips direction, a new key starts
    /// ascending.
    pub fn toggle(current: Option<SortConfig>, key: SortKey) -> SortConfig {
        let direction = match current {
            Some(active) if active.key == key && active.direction == SortDirection::Asc => {
                SortDirection::Desc
            }
            _ => SortDirection::Asc,
        };
        SortConfig { key, direction }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableQuery {
    pub search: String,
    pub exam_type: TypeFilter,
    pub status: StatusFilter,
    pub sort: Option<SortConfig>,
    /// Independent ordering by announcement date, applied after `sort`.
    pub announcement_sort: Option<SortDirection>,
}

/// One default-node column of a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCell {
    pub kind: DefaultNode,
    pub node: Option<TimeNode>,
    pub countdown: Option<Countdown>,
    pub countdown_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub exam: ExamRecord,
    pub status: ExamStatus,
    pub cells: Vec<NodeCell>,
}

/// Filters are ANDed: name search, then type, then computed status.
pub fn filter_records<'a>(
    records: &'a [ExamRecord],
    query: &TableQuery,
    now: NaiveDateTime,
) -> Vec<&'a ExamRecord> {
    let needle = query.search.trim().to_lowercase();
    records
        .iter()
        .filter(|record| needle.is_empty() || record.exam_name.to_lowercase().contains(&needle))
        .filter(|record| query.exam_type.matches(record))
        .filter(|record| query.status.matches(exam_status(&record.time_nodes, now)))
        .collect()
}

/// Apply the active sort key, then the announcement ordering on top. Both are
/// stable; records without a usable date go last in either direction.
pub fn sort_records(records: &mut [&ExamRecord], query: &TableQuery, now: NaiveDateTime) {
    if let Some(config) = query.sort {
        match config.key {
            SortKey::ExamName => records.sort_by(|a, b| {
                config.direction.apply(a.exam_name.cmp(&b.exam_name))
            }),
            SortKey::NextNode => records.sort_by(|a, b| {
                let a_at = next_node(&a.time_nodes, now).and_then(node_start);
                let b_at = next_node(&b.time_nodes, now).and_then(node_start);
                missing_last(a_at, b_at, config.direction)
            }),
        }
    }

    if let Some(direction) = query.announcement_sort {
        records.sort_by(|a, b| {
            missing_last(announcement_start(a), announcement_start(b), direction)
        });
    }
}

pub fn exam_table(records: &[ExamRecord], query: &TableQuery, now: NaiveDateTime) -> Vec<TableRow> {
    let mut selected = filter_records(records, query, now);
    sort_records(&mut selected, query, now);
    selected
        .into_iter()
        .map(|record| table_row(record, now))
        .collect()
}

pub fn table_row(record: &ExamRecord, now: NaiveDateTime) -> TableRow {
    let cells = DefaultNode::ALL
        .into_iter()
        .map(|kind| {
            let node = record
                .time_nodes
                .iter()
                .find(|node| node.default_kind() == Some(kind))
                .cloned();
            let countdown = node
                .as_ref()
                .filter(|node| !node.start_time().trim().is_empty())
                .map(|node| node_countdown(node, now));
            NodeCell {
                kind,
                countdown_label: countdown.map(|c| c.to_string()),
                countdown,
                node,
            }
        })
        .collect();
    TableRow {
        status: exam_status(&record.time_nodes, now),
        exam: record.clone(),
        cells,
    }
}

/// First node starting after `now`, else the last node in list order.
pub fn next_node(nodes: &[TimeNode], now: NaiveDateTime) -> Option<&TimeNode> {
    nodes
        .iter()
        .find(|node| {
            parse_node_time(node.start_time())
                .at()
                .is_some_and(|start| start > now)
        })
        .or_else(|| nodes.last())
}

/// Statuses present in the collection, first-seen order, for the filter menu.
pub fn available_statuses(records: &[ExamRecord], now: NaiveDateTime) -> Vec<ExamStatus> {
    let mut statuses = Vec::new();
    for record in records {
        let status = exam_status(&record.time_nodes, now);
        if !statuses.contains(&status) {
            statuses.push(status);
        }
    }
    statuses
}

fn node_start(node: &TimeNode) -> Option<NaiveDateTime> {
    start_key(node.start_time()).1
}

fn announcement_start(record: &ExamRecord) -> Option<NaiveDateTime> {
    record
        .time_nodes
        .iter()
        .find(|node| node.default_kind() == Some(DefaultNode::Announcement))
        .and_then(node_start)
}

fn missing_last<T: Ord>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(a.cmp(&b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn exam(id: i64, name: &str, kind: ExamType, nodes: Vec<TimeNode>) -> ExamRecord {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        ExamRecord {
            id,
            exam_name: name.into(),
            exam_type: kind,
            announcement_url: None,
            registration_url: None,
            time_nodes: nodes,
            notes: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn ids(rows: &[TableRow]) -> Vec<i64> {
        rows.iter().map(|row| row.exam.id).collect()
    }

    fn sorted(key: SortKey, direction: SortDirection) -> Option<SortConfig> {
        Some(SortConfig { key, direction })
    }

    #[test]
    fn toggle_flips_only_the_active_key() {
        let first = SortConfig::toggle(None, SortKey::ExamName);
        assert_eq!(first.direction, SortDirection::Asc);
        let second = SortConfig::toggle(Some(first), SortKey::ExamName);
        assert_eq!(second.direction, SortDirection::Desc);
        let third = SortConfig::toggle(Some(second), SortKey::ExamName);
        assert_eq!(third.direction, SortDirection::Asc);
        let other = SortConfig::toggle(Some(second), SortKey::NextNode);
        assert_eq!(Some(other), sorted(SortKey::NextNode, SortDirection::Asc));
    }

    #[test]
    fn name_sort_in_both_directions() {
        let records = vec![
            exam(1, "b", ExamType::Civil, vec![]),
            exam(2, "a", ExamType::Civil, vec![]),
            exam(3, "c", ExamType::Civil, vec![]),
        ];
        let mut query = TableQuery {
            sort: sorted(SortKey::ExamName, SortDirection::Asc),
            ..TableQuery::default()
        };
        assert_eq!(ids(&exam_table(&records, &query, now())), [2, 1, 3]);
        query.sort = sorted(SortKey::ExamName, SortDirection::Desc);
        assert_eq!(ids(&exam_table(&records, &query, now())), [3, 1, 2]);
    }

    #[test]
    fn next_node_sort_puts_dateless_records_last_either_way() {
        let late = TimeNode::range("written", "笔试时间", "2024-09-01T09:00", "2024-09-01T12:00");
        let soon = vec![
            TimeNode::range("registration", "网上报名", "2024-05-01T09:00", "2024-05-10T09:00"),
            TimeNode::range("written", "笔试时间", "2024-07-01T09:00", "2024-07-01T12:00"),
        ];
        let records = vec![
            exam(1, "none", ExamType::Civil, vec![]),
            exam(2, "late", ExamType::Civil, vec![late]),
            exam(3, "soon", ExamType::Civil, soon),
        ];
        let mut query = TableQuery {
            sort: sorted(SortKey::NextNode, SortDirection::Asc),
            ..TableQuery::default()
        };
        assert_eq!(ids(&exam_table(&records, &query, now())), [3, 2, 1]);
        query.sort = sorted(SortKey::NextNode, SortDirection::Desc);
        assert_eq!(ids(&exam_table(&records, &query, now())), [2, 3, 1]);
    }

    #[test]
    fn next_node_falls_back_to_the_last_node() {
        let nodes = vec![
            TimeNode::range("registration", "网上报名", "2024-01-01T09:00", "2024-01-05T09:00"),
            TimeNode::range("written", "笔试时间", "2024-02-01T09:00", "2024-02-01T12:00"),
        ];
        assert_eq!(next_node(&nodes, now()).map(|n| n.id()), Some("written"));
        assert!(next_node(&[], now()).is_none());
    }

    #[test]
    fn announcement_sort_layers_over_the_primary_sort() {
        let announce = |at: &str| TimeNode::single("announcement", "公告发布", at);
        let records = vec![
            exam(1, "c", ExamType::Civil, vec![announce("2024-03-01T09:00")]),
            exam(2, "a", ExamType::Civil, vec![]),
            exam(3, "b", ExamType::Civil, vec![announce("2024-03-01T09:00")]),
            exam(4, "d", ExamType::Civil, vec![announce("2024-01-01T09:00")]),
        ];
        let query = TableQuery {
            sort: sorted(SortKey::ExamName, SortDirection::Asc),
            announcement_sort: Some(SortDirection::Desc),
            ..TableQuery::default()
        };
        // Equal announcement dates keep the name order; no announcement goes last.
        assert_eq!(ids(&exam_table(&records, &query, now())), [3, 1, 4, 2]);
    }

    #[test]
    fn filters_are_anded() {
        let written =
            |start: &str, end: &str| vec![TimeNode::range("written", "笔试时间", start, end)];
        let open = || written("2024-05-01T09:00", "2099-01-01T09:00");
        let closed = written("2024-01-01T09:00", "2024-01-02T09:00");
        let records = vec![
            exam(1, "2024年江苏省考", ExamType::Civil, open()),
            exam(2, "2024年江苏省考补录", ExamType::Civil, closed),
            exam(3, "省考教师岗", ExamType::Teacher, open()),
            exam(4, "国考", ExamType::Civil, open()),
        ];
        let query = TableQuery {
            search: "省考".into(),
            exam_type: TypeFilter::Only(ExamType::Civil),
            status: StatusFilter::Only(ExamStatus::InProgress),
            ..TableQuery::default()
        };
        assert_eq!(ids(&exam_table(&records, &query, now())), [1]);
    }

    #[test]
    fn search_ignores_case() {
        let records = vec![exam(1, "IELTS Academic", ExamType::Language, vec![])];
        let query = TableQuery {
            search: "ielts".into(),
            ..TableQuery::default()
        };
        assert_eq!(filter_records(&records, &query, now()).len(), 1);
    }

    #[test]
    fn query_deserializes_from_ui_values() {
        let query: TableQuery = serde_json::from_value(serde_json::json!({
            "search": "省考",
            "examType": "civil",
            "status": "all",
            "sort": {"key": "nextNode", "direction": "desc"},
            "announcementSort": "asc"
        }))
        .unwrap();
        assert_eq!(query.exam_type, TypeFilter::Only(ExamType::Civil));
        assert_eq!(query.status, StatusFilter::All);
        assert_eq!(query.sort.unwrap().key, SortKey::NextNode);
        assert_eq!(query.announcement_sort, Some(SortDirection::Asc));
    }

    #[test]
    fn unknown_filter_values_are_rejected() {
        let bad_type =
            serde_json::from_value::<TableQuery>(serde_json::json!({"examType": "medical"}));
        assert!(bad_type.unwrap_err().to_string().contains("medical"));
        let bad_status =
            serde_json::from_value::<TableQuery>(serde_json::json!({"status": "paused"}));
        assert!(bad_status.unwrap_err().to_string().contains("paused"));

        let blank: TableQuery =
            serde_json::from_value(serde_json::json!({"examType": "", "status": ""})).unwrap();
        assert_eq!(blank.exam_type, TypeFilter::All);
        assert_eq!(blank.status, StatusFilter::All);
    }

    #[test]
    fn rows_expose_default_cells_and_statuses() {
        let nodes = vec![
            TimeNode::single("announcement", "公告发布", "2024-06-01T08:00"),
            TimeNode::range("registration", "网上报名", "2024-06-03T09:00", "2024-06-05T09:00"),
        ];
        let records = vec![
            exam(1, "a", ExamType::Civil, nodes),
            exam(2, "b", ExamType::Civil, vec![]),
        ];
        let row = table_row(&records[0], now());
        assert_eq!(row.cells.len(), 6);
        assert_eq!(row.cells[0].countdown, Some(Countdown::Today));
        assert_eq!(
            row.cells[1].countdown_label.as_deref(),
            Some("Not started, 2 day(s) until start")
        );
        assert!(row.cells[5].node.is_none());
        assert_eq!(
            available_statuses(&records, now()),
            [ExamStatus::InProgress, ExamStatus::NotStarted]
        );
    }
}
