//! Exam status and per-node countdown labels.
//!
//! Both are pure functions of the node data and the caller's `now`; they are
//! recomputed on every render and never fail. Bad dates turn into
//! [`Countdown::Incomplete`] or [`Countdown::FormatError`].

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::db::{
    helpers::{parse_node_time, NodeTime},
    models::{NodeKind, TimeNode},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExamStatus {
    NotStarted,
    InProgress,
    Ended,
}

impl ExamStatus {
    pub const ALL: [ExamStatus; 3] = [
        ExamStatus::NotStarted,
        ExamStatus::InProgress,
        ExamStatus::Ended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExamStatus::NotStarted => "notStarted",
            ExamStatus::InProgress => "inProgress",
            ExamStatus::Ended => "ended",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExamStatus::NotStarted => "未开始",
            ExamStatus::InProgress => "进行中",
            ExamStatus::Ended => "已结束",
        }
    }

    /// Accepts the wire name, the Rust-style name or the display label.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|status| {
            status.as_str().eq_ignore_ascii_case(value)
                || format!("{status:?}") == value
                || status.label() == value
        })
    }
}

/// Status of an exam from the last node in stored order.
///
/// This is positional on purpose: it does not look for the chronologically
/// latest node. A last node whose end cannot be read counts as in progress.
pub fn exam_status(nodes: &[TimeNode], now: NaiveDateTime) -> ExamStatus {
    let Some(last) = nodes.last() else {
        return ExamStatus::NotStarted;
    };
    match parse_node_time(last.end_time()) {
        NodeTime::At(end) if now > end => ExamStatus::Ended,
        _ => ExamStatus::InProgress,
    }
}

/// Human-readable countdown for one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Countdown {
    Ended,
    Today,
    #[serde(rename_all = "camelCase")]
    DaysRemaining { days: i64 },
    #[serde(rename_all = "camelCase")]
    InProgress { days_left: i64 },
    #[serde(rename_all = "camelCase")]
    NotStarted { days_until: i64 },
    Incomplete,
    FormatError,
}

impl Countdown {
    /// Styling bucket used by badges.
    pub fn tone(&self) -> &'static str {
        match self {
            Countdown::Ended => "ended",
            Countdown::Today => "today",
            Countdown::InProgress { .. } => "ongoing",
            Countdown::DaysRemaining { .. } | Countdown::NotStarted { .. } => "upcoming",
            Countdown::Incomplete | Countdown::FormatError => "unknown",
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Ended => f.write_str("Ended"),
            Countdown::Today => f.write_str("Today"),
            Countdown::DaysRemaining { days } => write!(f, "{days} day(s) remaining"),
            Countdown::InProgress { days_left } => {
                write!(f, "In progress, {days_left} day(s) left")
            }
            Countdown::NotStarted { days_until } => {
                write!(f, "Not started, {days_until} day(s) until start")
            }
            Countdown::Incomplete => f.write_str("Incomplete"),
            Countdown::FormatError => f.write_str("Format error"),
        }
    }
}

/// Countdown for raw node values. Day counts are calendar-date differences,
/// so a start or end falling on `now`'s date counts as zero days away.
pub fn countdown(start: &str, end: &str, kind: NodeKind, now: NaiveDateTime) -> Countdown {
    let today = now.date();
    let start = match date_of(start) {
        Ok(date) => date,
        Err(sentinel) => return sentinel,
    };

    match kind {
        NodeKind::Single => {
            if start < today {
                Countdown::Ended
            } else if start == today {
                Countdown::Today
            } else {
                Countdown::DaysRemaining {
                    days: days_between(today, start),
                }
            }
        }
        NodeKind::Range => {
            let end = match date_of(end) {
                Ok(date) => date,
                Err(sentinel) => return sentinel,
            };
            if end < today {
                Countdown::Ended
            } else if start <= today {
                Countdown::InProgress {
                    days_left: days_between(today, end),
                }
            } else {
                Countdown::NotStarted {
                    days_until: days_between(today, start),
                }
            }
        }
    }
}

pub fn node_countdown(node: &TimeNode, now: NaiveDateTime) -> Countdown {
    countdown(node.start_time(), node.end_time(), node.kind(), now)
}

fn date_of(value: &str) -> Result<NaiveDate, Countdown> {
    match parse_node_time(value) {
        NodeTime::At(at) => Ok(at.date()),
        NodeTime::Missing => Err(Countdown::Incomplete),
        NodeTime::Invalid => Err(Countdown::FormatError),
    }
}

fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 6)
            .unwrap()
            .and_hms_opt(15, 45, 0)
            .unwrap()
    }

    #[test]
    fn status_keys_off_the_last_node_in_list_order() {
        let nodes = vec![
            TimeNode::range("written", "笔试时间", "2099-01-01T09:00", "2099-01-02T09:00"),
            TimeNode::range("custom_1", "体检", "2020-01-01T09:00", "2020-01-01T12:00"),
        ];
        // The written exam is far in the future, but the appended custom node
        // is last and has ended.
        assert_eq!(exam_status(&nodes, now()), ExamStatus::Ended);
    }

    #[test]
    fn unreadable_last_end_counts_as_in_progress() {
        let nodes = vec![TimeNode::range("written", "笔试时间", "2024-01-01T09:00", "")];
        assert_eq!(exam_status(&nodes, now()), ExamStatus::InProgress);
        let nodes = vec![TimeNode::range("written", "笔试时间", "2024-01-01T09:00", "soon")];
        assert_eq!(exam_status(&nodes, now()), ExamStatus::InProgress);
    }

    #[test]
    fn single_node_boundaries() {
        let single = |start: &str| countdown(start, start, NodeKind::Single, now());
        assert_eq!(single("2024-03-06T08:00"), Countdown::Today);
        assert_eq!(single("2024-03-06T23:59"), Countdown::Today);
        assert_eq!(single("2024-03-05T23:59"), Countdown::Ended);
        assert_eq!(single("2024-03-09T09:00"), Countdown::DaysRemaining { days: 3 });
    }

    #[test]
    fn range_node_boundaries() {
        let range = |start: &str, end: &str| countdown(start, end, NodeKind::Range, now());
        assert_eq!(
            range("2024-03-06T20:00", "2024-03-08T09:00"),
            Countdown::InProgress { days_left: 2 }
        );
        assert_eq!(
            range("2024-03-01T09:00", "2024-03-06T09:00"),
            Countdown::InProgress { days_left: 0 }
        );
        let spanning_today = range("2024-03-05T09:00", "2024-03-07T09:00");
        assert_eq!(spanning_today, Countdown::InProgress { days_left: 1 });
        assert_eq!(spanning_today.to_string(), "In progress, 1 day(s) left");
        assert_eq!(range("2024-03-01T09:00", "2024-03-05T23:00"), Countdown::Ended);
        assert_eq!(
            range("2024-03-10T09:00", "2024-03-12T09:00"),
            Countdown::NotStarted { days_until: 4 }
        );
    }

    #[test]
    fn sentinels_for_missing_and_malformed_values() {
        assert_eq!(countdown("", "", NodeKind::Single, now()), Countdown::Incomplete);
        assert_eq!(
            countdown("2024-03-01T09:00", "", NodeKind::Range, now()),
            Countdown::Incomplete
        );
        assert_eq!(
            countdown("03/01/2024", "2024-03-07", NodeKind::Range, now()),
            Countdown::FormatError
        );
        assert_eq!(
            countdown("2024-03-01", "whenever", NodeKind::Range, now()),
            Countdown::FormatError
        );
    }

    #[test]
    fn labels_render_for_display() {
        assert_eq!(
            Countdown::InProgress { days_left: 1 }.to_string(),
            "In progress, 1 day(s) left"
        );
        assert_eq!(Countdown::DaysRemaining { days: 5 }.to_string(), "5 day(s) remaining");
        assert_eq!(
            Countdown::NotStarted { days_until: 2 }.to_string(),
            "Not started, 2 day(s) until start"
        );
        assert_eq!(Countdown::FormatError.to_string(), "Format error");
        assert_eq!(Countdown::Today.tone(), "today");
    }

    #[test]
    fn status_parses_every_spelling() {
        assert_eq!(ExamStatus::parse("inProgress"), Some(ExamStatus::InProgress));
        assert_eq!(ExamStatus::parse("InProgress"), Some(ExamStatus::InProgress));
        assert_eq!(ExamStatus::parse("已结束"), Some(ExamStatus::Ended));
        assert_eq!(ExamStatus::parse("paused"), None);
    }
}
