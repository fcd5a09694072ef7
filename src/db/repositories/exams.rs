//! CRUD over the exam collection.
//!
//! The whole collection lives in one document under [`STORAGE_KEY`]. Every
//! mutation reads the document, changes it and writes it back. A process-local
//! guard serialises those steps inside one repository; separate repositories
//! over the same store are not coordinated and the last writer wins.
//!
//! Records are decoded one by one. An entry that cannot be read is logged,
//! left out of every result and written back unchanged on the next save.

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    clock::Clock,
    db::{
        models::{
            validation::{prepare_time_nodes, validate_collection, validate_exam_name},
            ExamId, ExamRecord, ExamRecordInput, ExamRecordPatch, TimeNode,
        },
        sample::sample_records,
        store::DocumentStore,
    },
    log_debug, log_error, log_info, log_warn,
};

const ENABLE_LOGS: bool = true;

pub const STORAGE_KEY: &str = "exam_records";

/// The stored document, split into readable records and raw entries that
/// failed to decode.
#[derive(Debug, Default)]
struct StoredCollection {
    records: Vec<ExamRecord>,
    unreadable: Vec<Value>,
}

impl StoredCollection {
    fn max_id(&self) -> Option<ExamId> {
        let readable = self.records.iter().map(|record| record.id);
        let raw = self
            .unreadable
            .iter()
            .filter_map(|entry| entry.get("id").and_then(Value::as_i64));
        readable.chain(raw).max()
    }
}

impl From<Vec<ExamRecord>> for StoredCollection {
    fn from(records: Vec<ExamRecord>) -> Self {
        Self {
            records,
            unreadable: Vec::new(),
        }
    }
}

pub struct ExamRepository {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    write_guard: Mutex<()>,
}

impl ExamRepository {
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_guard: Mutex::new(()),
        }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// All records in insertion order. An uninitialised store is empty.
    pub fn list(&self) -> Result<Vec<ExamRecord>> {
        Ok(self.load()?.records)
    }

    pub fn get_by_id(&self, id: ExamId) -> Result<Option<ExamRecord>> {
        Ok(self.load()?.records.into_iter().find(|record| record.id == id))
    }

    /// Create a record with a fresh id and `createdAt == updatedAt == now`.
    pub fn add(&self, input: ExamRecordInput) -> Result<ExamRecord> {
        validate_exam_name(&input.exam_name)?;
        let _guard = self.lock()?;

        let mut stored = self.load()?;
        let now = self.clock.now_utc();
        let id = next_id(stored.max_id(), now.timestamp_millis())?;
        let record = ExamRecord {
            id,
            exam_name: input.exam_name,
            exam_type: input.exam_type,
            announcement_url: input.announcement_url,
            registration_url: input.registration_url,
            time_nodes: prepare_time_nodes(input.time_nodes, now.timestamp_millis())?,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };

        stored.records.push(record.clone());
        self.save(&stored)?;
        log_info!("Added exam {} ({})", record.id, record.exam_name);
        Ok(record)
    }

    /// Shallow merge of `patch` over the stored record. `Ok(None)` when the
    /// id is unknown; nothing is written in that case.
    pub fn update(&self, id: ExamId, patch: ExamRecordPatch) -> Result<Option<ExamRecord>> {
        if let Some(name) = &patch.exam_name {
            validate_exam_name(name)?;
        }
        let _guard = self.lock()?;

        let mut stored = self.load()?;
        let Some(index) = stored.records.iter().position(|record| record.id == id) else {
            log_debug!("Update skipped: exam {} not found", id);
            return Ok(None);
        };

        let now = self.clock.now_utc();
        let mut patch = patch;
        if let Some(nodes) = patch.time_nodes.take() {
            patch.time_nodes = Some(prepare_time_nodes(nodes, now.timestamp_millis())?);
        }

        let record = &mut stored.records[index];
        patch.apply_to(record);
        record.updated_at = now;
        let updated = record.clone();

        self.save(&stored)?;
        log_info!("Updated exam {}", id);
        Ok(Some(updated))
    }

    /// Hard delete. Returns whether a record was removed; an unknown id is a
    /// no-op and writes nothing.
    pub fn delete(&self, id: ExamId) -> Result<bool> {
        let _guard = self.lock()?;

        let mut stored = self.load()?;
        let before = stored.records.len();
        stored.records.retain(|record| record.id != id);
        if stored.records.len() == before {
            log_debug!("Delete skipped: exam {} not found", id);
            return Ok(false);
        }

        self.save(&stored)?;
        log_info!("Deleted exam {}", id);
        Ok(true)
    }

    /// Seed the demonstration dataset when the store has never been written.
    pub fn init_sample_data(&self) -> Result<bool> {
        let _guard = self.lock()?;

        let existing = self
            .store
            .read(STORAGE_KEY)
            .context("failed to read exam records")?;
        if existing.is_some_and(|doc| !doc.trim().is_empty()) {
            return Ok(false);
        }

        self.save(&StoredCollection::from(sample_records()))?;
        log_info!("Seeded sample exam records");
        Ok(true)
    }

    /// Replace the entire collection, as a destructive import does.
    /// Unreadable entries from the old document are dropped too.
    pub fn replace_all(&self, mut records: Vec<ExamRecord>) -> Result<usize> {
        for record in &mut records {
            record.time_nodes.iter_mut().for_each(TimeNode::normalize);
        }
        validate_collection(&records)?;
        let _guard = self.lock()?;

        let count = records.len();
        self.save(&StoredCollection::from(records))?;
        log_info!("Replaced exam collection with {} records", count);
        Ok(count)
    }

    /// Drop the stored document entirely; the next seed call will repopulate it.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.lock()?;
        self.store
            .clear(STORAGE_KEY)
            .context("failed to clear exam records")?;
        log_info!("Cleared exam records");
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_guard
            .lock()
            .map_err(|_| anyhow!("exam repository write guard poisoned"))
    }

    fn load(&self) -> Result<StoredCollection> {
        let document = match self.store.read(STORAGE_KEY) {
            Ok(document) => document,
            Err(err) => {
                log_error!("Failed to read exam records: {err:#}");
                return Err(err.context("failed to read exam records"));
            }
        };

        let Some(doc) = document.filter(|doc| !doc.trim().is_empty()) else {
            return Ok(StoredCollection::default());
        };
        let entries: Vec<Value> =
            serde_json::from_str(&doc).context("stored exam records are not valid JSON")?;

        let mut stored = StoredCollection::default();
        for (index, entry) in entries.into_iter().enumerate() {
            match ExamRecord::deserialize(&entry) {
                Ok(record) => stored.records.push(record),
                Err(err) => {
                    log_warn!("Skipping unreadable exam record at index {index}: {err}");
                    stored.unreadable.push(entry);
                }
            }
        }
        Ok(stored)
    }

    fn save(&self, stored: &StoredCollection) -> Result<()> {
        let mut entries = Vec::with_capacity(stored.records.len() + stored.unreadable.len());
        for record in &stored.records {
            entries.push(serde_json::to_value(record).context("failed to serialize exam records")?);
        }
        entries.extend(stored.unreadable.iter().cloned());
        let document =
            serde_json::to_string(&entries).context("failed to serialize exam records")?;
        if let Err(err) = self.store.write(STORAGE_KEY, &document) {
            log_error!("Failed to write exam records: {err:#}");
            return Err(err.context("failed to write exam records"));
        }
        Ok(())
    }
}

/// Millisecond timestamp, bumped past the largest existing id so rapid
/// creation never collides.
fn next_id(max_existing: Option<ExamId>, now_millis: i64) -> Result<ExamId> {
    match max_existing {
        Some(max) if max >= now_millis => max
            .checked_add(1)
            .ok_or_else(|| anyhow!("no exam id available after {max}")),
        _ => Ok(now_millis),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::FixedClock,
        db::{
            models::{ExamType, NodeKind, TimeNode},
            store::MemoryStore,
        },
    };
    use chrono::{TimeZone, Utc};

    fn repo_at(millis: i64) -> (ExamRepository, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let clock = FixedClock::new(Utc.timestamp_millis_opt(millis).single().unwrap());
        (ExamRepository::new(store.clone(), Arc::new(clock)), store)
    }

    #[test]
    fn ids_stay_unique_when_the_clock_does_not_move() {
        let (repo, _) = repo_at(1_700_000_000_000);
        let a = repo.add(ExamRecordInput::new("国考", ExamType::Civil)).unwrap();
        let b = repo.add(ExamRecordInput::new("省考", ExamType::Civil)).unwrap();
        assert_eq!(a.id, 1_700_000_000_000);
        assert_eq!(b.id, 1_700_000_000_001);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn add_rejects_a_blank_name_without_writing() {
        let (repo, store) = repo_at(1);
        assert!(repo.add(ExamRecordInput::new(" ", ExamType::Other)).is_err());
        assert_eq!(store.read(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn update_normalises_replacement_nodes() {
        let (repo, _) = repo_at(1_000);
        let exam = repo.add(ExamRecordInput::new("CET-4", ExamType::Language)).unwrap();

        let mut node =
            TimeNode::range("written", "笔试时间", "2024-06-15T09:00", "2024-06-15T11:20");
        node.set_kind(NodeKind::Single);
        let patch = ExamRecordPatch {
            time_nodes: Some(vec![node]),
            ..ExamRecordPatch::default()
        };
        let updated = repo.update(exam.id, patch).unwrap().unwrap();
        assert_eq!(updated.time_nodes[0].end_time(), "2024-06-15T09:00");
    }

    #[test]
    fn next_id_prefers_the_clock() {
        assert_eq!(next_id(None, 42).unwrap(), 42);
        assert_eq!(next_id(Some(42), 42).unwrap(), 43);
        assert_eq!(next_id(Some(7), 42).unwrap(), 42);
    }

    #[test]
    fn unreadable_records_are_skipped_and_kept_on_write() {
        let document = r#"[
            {"id": 1, "examName": "good", "examType": "civil",
             "timeNodes": [{"id": "written", "label": "笔试时间", "type": "weekly",
                            "startTime": "2024-03-01T09:00", "endTime": "2024-03-01T12:00"}],
             "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"},
            {"id": 2, "examName": "broken", "timeNodes": [],
             "createdAt": "last tuesday", "updatedAt": "2024-01-01T00:00:00Z"}
        ]"#;
        let store = Arc::new(MemoryStore::with_document(STORAGE_KEY, document));
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        let repo = ExamRepository::new(store.clone(), Arc::new(clock));

        let records = repo.list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].exam_name, "good");
        assert_eq!(records[0].time_nodes[0].kind(), NodeKind::Range);
        assert!(repo.get_by_id(2).unwrap().is_none());

        repo.delete(1).unwrap();
        let raw: Vec<serde_json::Value> =
            serde_json::from_str(&store.read(STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0]["examName"], "broken");
        assert_eq!(raw[0]["createdAt"], "last tuesday");
    }

    #[test]
    fn exhausted_id_space_is_an_error_not_a_panic() {
        let (repo, _) = repo_at(1_000);
        let mut imported = repo.add(ExamRecordInput::new("max", ExamType::Other)).unwrap();
        imported.id = i64::MAX;
        repo.replace_all(vec![imported]).unwrap();

        let err = repo.add(ExamRecordInput::new("next", ExamType::Other)).unwrap_err();
        assert!(err.to_string().contains("no exam id available"));
        // The write guard is still usable afterwards.
        assert!(repo.delete(i64::MAX).unwrap());
        assert!(repo.add(ExamRecordInput::new("next", ExamType::Other)).is_ok());
    }

    #[test]
    fn replace_all_pins_default_labels() {
        let (repo, _) = repo_at(1_000);
        let mut record = repo.add(ExamRecordInput::new("CPA", ExamType::Professional)).unwrap();
        record.time_nodes = serde_json::from_str(
            r#"[{"id": "payment", "label": "交钱", "type": "range", "startTime": "", "endTime": ""}]"#,
        )
        .unwrap();
        repo.replace_all(vec![record]).unwrap();
        assert_eq!(repo.list().unwrap()[0].time_nodes[0].label(), "网上缴费");
    }

    #[test]
    fn corrupt_documents_surface_as_errors() {
        let store = Arc::new(MemoryStore::with_document(STORAGE_KEY, "{not json"));
        let repo = ExamRepository::new(store, Arc::new(FixedClock::new(Utc::now())));
        let err = repo.list().unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }
}
