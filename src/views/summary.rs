//! Dashboard header counters plus the feed they sit above.

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use super::feed::{chronological_feed, FeedItem};
use crate::db::{helpers::parse_node_time, models::ExamRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_exams: usize,
    pub upcoming_node_count: usize,
    pub exams_this_month: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub summary: DashboardSummary,
    pub feed: Vec<FeedItem>,
}

pub fn dashboard(records: &[ExamRecord], now: NaiveDateTime) -> Dashboard {
    let feed = chronological_feed(records);
    let summary = DashboardSummary {
        total_exams: records.len(),
        upcoming_node_count: feed.len(),
        exams_this_month: records
            .iter()
            .filter(|record| starts_in_month_of(record, now))
            .count(),
    };
    Dashboard { summary, feed }
}

/// An exam belongs to a month through its first node that has a start time.
fn starts_in_month_of(record: &ExamRecord, now: NaiveDateTime) -> bool {
    record
        .time_nodes
        .iter()
        .find(|node| !node.start_time().trim().is_empty())
        .and_then(|node| parse_node_time(node.start_time()).date())
        .is_some_and(|date| date.year() == now.year() && date.month() == now.month())
}
