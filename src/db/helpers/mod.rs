use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Accepted layouts for node times, most common first.
const NODE_TIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// A node time after parsing. Views branch on this instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTime {
    Missing,
    Invalid,
    At(NaiveDateTime),
}

impl NodeTime {
    pub fn at(self) -> Option<NaiveDateTime> {
        match self {
            NodeTime::At(at) => Some(at),
            _ => None,
        }
    }

    pub fn date(self) -> Option<NaiveDate> {
        self.at().map(|at| at.date())
    }
}

/// Parse a local date-time string as stored on a time node.
///
/// Date-only values mean local midnight; RFC 3339 values keep their wall time
/// and drop the offset.
pub fn parse_node_time(value: &str) -> NodeTime {
    let value = value.trim();
    if value.is_empty() {
        return NodeTime::Missing;
    }

    for format in NODE_TIME_FORMATS {
        if let Ok(at) = NaiveDateTime::parse_from_str(value, format) {
            return NodeTime::At(at);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return NodeTime::At(midnight);
        }
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return NodeTime::At(at.naive_local());
    }

    NodeTime::Invalid
}

/// Split `YYYY-MM-DDTHH:MM` into its date and time halves.
pub fn split_date_time(value: &str) -> (&str, &str) {
    match value.split_once('T') {
        Some((date, time)) => (date, time),
        None => (value, ""),
    }
}

/// Join date and time halves; empty when the date is missing.
pub fn join_date_time(date: &str, time: &str) -> String {
    if date.trim().is_empty() {
        return String::new();
    }
    let time = if time.trim().is_empty() { "00:00" } else { time };
    format!("{date}T{time}")
}
