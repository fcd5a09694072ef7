use serde_json::Value;

use crate::{
    ipc::{
        helpers::{parse_params, respond},
        types::Request,
    },
    settings::TrackerSettings,
    settings_commands::{get_settings, update_settings},
    AppState,
};

pub fn try_handle(state: &AppState, req: &Request) -> Option<Value> {
    let resp = match req.method.as_str() {
        "settings.get" => respond(&req.id, get_settings(state)),
        "settings.update" => match parse_params::<TrackerSettings>(req) {
            Ok(settings) => respond(&req.id, update_settings(state, settings)),
            Err(resp) => resp,
        },
        _ => return None,
    };
    Some(resp)
}
