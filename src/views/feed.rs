//! Chronological feed of every dated node across all exams (dashboard).

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::db::{
    helpers::parse_node_time,
    models::{ExamId, ExamRecord, ExamType, TimeNode},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub exam_id: ExamId,
    pub exam_name: String,
    pub exam_type: ExamType,
    pub node: TimeNode,
}

/// Flatten nodes that have both a start and an end, tag them with their exam
/// and order them by start. Ties keep their original order.
pub fn chronological_feed(records: &[ExamRecord]) -> Vec<FeedItem> {
    let mut items: Vec<FeedItem> = records
        .iter()
        .flat_map(|record| {
            record
                .time_nodes
                .iter()
                .filter(|node| node.has_times())
                .map(move |node| FeedItem {
                    exam_id: record.id,
                    exam_name: record.exam_name.clone(),
                    exam_type: record.exam_type,
                    node: node.clone(),
                })
        })
        .collect();
    items.sort_by_key(|item| start_key(item.node.start_time()));
    items
}

/// A single exam's nodes ordered by start; missing or unreadable starts last.
pub fn sort_by_start(nodes: &[TimeNode]) -> Vec<TimeNode> {
    let mut sorted = nodes.to_vec();
    sorted.sort_by_key(|node| start_key(node.start_time()));
    sorted
}

/// Sort key that places unreadable values after every real timestamp.
pub(crate) fn start_key(value: &str) -> (bool, Option<NaiveDateTime>) {
    match parse_node_time(value).at() {
        Some(at) => (false, Some(at)),
        None => (true, None),
    }
}
