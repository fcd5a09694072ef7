//! Single-exam detail: nodes in start order, each with its countdown.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::{
    feed::sort_by_start,
    status::{exam_status, node_countdown, Countdown, ExamStatus},
};
use crate::db::models::{ExamRecord, TimeNode};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailNode {
    pub node: TimeNode,
    pub countdown: Countdown,
    pub countdown_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDetail {
    pub exam: ExamRecord,
    pub status: ExamStatus,
    pub type_label: &'static str,
    pub nodes: Vec<DetailNode>,
}

pub fn exam_detail(record: &ExamRecord, now: NaiveDateTime) -> ExamDetail {
    let nodes = sort_by_start(&record.time_nodes)
        .into_iter()
        .map(|node| {
            let countdown = node_countdown(&node, now);
            DetailNode {
                countdown_label: countdown.to_string(),
                countdown,
                node,
            }
        })
        .collect();
    ExamDetail {
        status: exam_status(&record.time_nodes, now),
        type_label: record.exam_type.label(),
        exam: record.clone(),
        nodes,
    }
}
