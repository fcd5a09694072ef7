use serde::Deserialize;
use serde_json::Value;

use crate::{
    backup::commands,
    ipc::{
        error::err,
        helpers::{parse_params, respond},
        types::Request,
    },
    AppState,
};

/// Backup contents inline (`text`) or on disk (`path`). Without
/// `confirm: true` the file is only validated and previewed.
#[derive(Deserialize, Default)]
#[serde(default)]
struct ImportParams {
    text: Option<String>,
    path: Option<String>,
    confirm: bool,
}

pub fn try_handle(state: &AppState, req: &Request) -> Option<Value> {
    let resp = match req.method.as_str() {
        "backup.export" => respond(&req.id, commands::export_backup(state)),
        "backup.import" => match parse_params::<ImportParams>(req) {
            Ok(p) => handle_import(state, req, p),
            Err(resp) => resp,
        },
        _ => return None,
    };
    Some(resp)
}

fn handle_import(state: &AppState, req: &Request, params: ImportParams) -> Value {
    let text = match (params.text, params.path) {
        (Some(text), _) => text,
        (None, Some(path)) => match commands::read_backup_file(&path) {
            Ok(text) => text,
            Err(message) => return err(&req.id, "io_error", message),
        },
        (None, None) => return err(&req.id, "bad_params", "text or path is required"),
    };
    if params.confirm {
        respond(&req.id, commands::apply_import(state, &text, true))
    } else {
        respond(&req.id, commands::preview_import(state, &text))
    }
}
