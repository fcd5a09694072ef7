use serde::Deserialize;
use serde_json::Value;

use crate::{
    db::models::ExamId,
    ipc::{
        helpers::{parse_params, respond, respond_found},
        types::Request,
    },
    views::{commands, TableQuery},
    AppState,
};

#[derive(Deserialize, Default)]
#[serde(default)]
struct CalendarParams {
    year: Option<i32>,
    month: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailParams {
    exam_id: ExamId,
}

pub fn try_handle(state: &AppState, req: &Request) -> Option<Value> {
    let resp = match req.method.as_str() {
        "views.dashboard" => respond(&req.id, commands::get_dashboard(state)),
        "views.feed" => respond(&req.id, commands::get_feed(state)),
        "views.table" => match parse_params::<TableQuery>(req) {
            Ok(query) => respond(&req.id, commands::get_exam_table(state, query)),
            Err(resp) => resp,
        },
        "views.calendar" => match parse_params::<CalendarParams>(req) {
            Ok(p) => respond(&req.id, commands::get_calendar(state, p.year, p.month)),
            Err(resp) => resp,
        },
        "views.detail" => match parse_params::<DetailParams>(req) {
            Ok(p) => respond_found(&req.id, "exam", commands::get_exam_detail(state, p.exam_id)),
            Err(resp) => resp,
        },
        _ => return None,
    };
    Some(resp)
}
