use serde::Deserialize;
use serde_json::Value;

use crate::{
    db::models::{ExamId, ExamRecordInput, ExamRecordPatch},
    editor::ExamDraft,
    exams::commands,
    ipc::{
        helpers::{parse_params, respond, respond_found},
        types::Request,
    },
    AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExamIdParams {
    exam_id: ExamId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateParams {
    exam_id: ExamId,
    #[serde(default)]
    patch: ExamRecordPatch,
}

#[derive(Deserialize)]
struct DraftParams {
    draft: ExamDraft,
}

#[derive(Deserialize)]
struct PasteParams {
    text: String,
}

pub fn try_handle(state: &AppState, req: &Request) -> Option<Value> {
    let resp = match req.method.as_str() {
        "exams.list" => respond(&req.id, commands::list_exams(state)),
        "exams.get" => match parse_params::<ExamIdParams>(req) {
            Ok(p) => respond(&req.id, commands::get_exam(state, p.exam_id)),
            Err(resp) => resp,
        },
        "exams.add" => match parse_params::<ExamRecordInput>(req) {
            Ok(input) => respond(&req.id, commands::add_exam(state, input)),
            Err(resp) => resp,
        },
        "exams.update" => match parse_params::<UpdateParams>(req) {
            Ok(p) => respond_found(
                &req.id,
                "exam",
                commands::update_exam(state, p.exam_id, p.patch),
            ),
            Err(resp) => resp,
        },
        "exams.delete" => match parse_params::<ExamIdParams>(req) {
            Ok(p) => respond(&req.id, commands::delete_exam(state, p.exam_id)),
            Err(resp) => resp,
        },
        "exams.seed" => respond(&req.id, commands::seed_sample_data(state)),
        "exams.saveDraft" => match parse_params::<DraftParams>(req) {
            Ok(p) => respond_found(&req.id, "exam", commands::save_draft(state, p.draft)),
            Err(resp) => resp,
        },
        "editor.pasteNodes" => match parse_params::<PasteParams>(req) {
            Ok(p) => respond(&req.id, commands::parse_pasted_time_nodes(state, &p.text)),
            Err(resp) => resp,
        },
        _ => return None,
    };
    Some(resp)
}
