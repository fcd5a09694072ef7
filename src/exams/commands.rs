//! Exam CRUD commands for the presentation layer.

use crate::{
    db::models::{ExamId, ExamRecord, ExamRecordInput, ExamRecordPatch, TimeNode},
    editor::{parse_pasted_nodes, ExamDraft},
    AppState,
};

pub fn list_exams(state: &AppState) -> Result<Vec<ExamRecord>, String> {
    state.exams.list().map_err(|e| e.to_string())
}

pub fn get_exam(state: &AppState, exam_id: ExamId) -> Result<Option<ExamRecord>, String> {
    state.exams.get_by_id(exam_id).map_err(|e| e.to_string())
}

pub fn add_exam(state: &AppState, input: ExamRecordInput) -> Result<ExamRecord, String> {
    state.exams.add(input).map_err(|e| e.to_string())
}

pub fn update_exam(
    state: &AppState,
    exam_id: ExamId,
    patch: ExamRecordPatch,
) -> Result<Option<ExamRecord>, String> {
    state.exams.update(exam_id, patch).map_err(|e| e.to_string())
}

pub fn delete_exam(state: &AppState, exam_id: ExamId) -> Result<bool, String> {
    state.exams.delete(exam_id).map_err(|e| e.to_string())
}

pub fn seed_sample_data(state: &AppState) -> Result<bool, String> {
    state.exams.init_sample_data().map_err(|e| e.to_string())
}

/// Submit the entry form: update when editing, add otherwise. `None` means
/// the record being edited no longer exists.
pub fn save_draft(state: &AppState, draft: ExamDraft) -> Result<Option<ExamRecord>, String> {
    match draft.editing {
        Some(exam_id) => {
            let patch = ExamRecordPatch::from(draft.into_input());
            update_exam(state, exam_id, patch)
        }
        None => add_exam(state, draft.into_input()).map(Some),
    }
}

pub fn parse_pasted_time_nodes(state: &AppState, text: &str) -> Result<Vec<TimeNode>, String> {
    parse_pasted_nodes(text, state.exams.clock().now_millis()).map_err(|e| e.to_string())
}
