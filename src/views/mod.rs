//! Derived views over the exam collection.
//!
//! Everything here is a pure function of `(records, now)`: nothing is stored
//! and nothing fails. Callers pass local wall-clock time from the clock.

pub mod calendar;
pub mod commands;
pub mod detail;
pub mod feed;
pub mod status;
pub mod summary;
pub mod table;

pub use calendar::{calendar_month, occurrences_on, CalendarDay, CalendarGroup, CalendarMonth};
pub use detail::{exam_detail, ExamDetail};
pub use feed::{chronological_feed, sort_by_start, FeedItem};
pub use status::{countdown, exam_status, node_countdown, Countdown, ExamStatus};
pub use summary::{dashboard, Dashboard, DashboardSummary};
pub use table::{
    available_statuses, exam_table, next_node, SortConfig, SortDirection, SortKey, StatusFilter,
    TableQuery, TableRow, TypeFilter,
};
