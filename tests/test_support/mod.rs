#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use examtrack_lib::{
    clock::FixedClock,
    db::{DocumentStore, ExamRepository, MemoryStore},
};

pub fn temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{prefix}-{nanos}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// 2024-06-01 08:00, used as "now" across the suite.
pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()))
}

pub fn local_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

pub fn memory_repo() -> (ExamRepository, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (ExamRepository::new(store.clone(), fixed_clock()), store)
}

pub fn repo_over(store: Arc<dyn DocumentStore>) -> ExamRepository {
    ExamRepository::new(store, fixed_clock())
}
