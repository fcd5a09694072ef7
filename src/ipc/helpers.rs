use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};

use super::{
    error::{err, ok},
    types::Request,
};

/// Decode `params`; an absent value reads as `{}` so all-default param
/// structs work without one.
pub fn parse_params<T: DeserializeOwned>(req: &Request) -> Result<T, Value> {
    let params = if req.params.is_null() {
        json!({})
    } else {
        req.params.clone()
    };
    serde_json::from_value(params).map_err(|e| err(&req.id, "bad_params", e.to_string()))
}

pub fn respond<T: Serialize>(id: &str, result: Result<T, String>) -> Value {
    match result {
        Ok(value) => match serde_json::to_value(value) {
            Ok(value) => ok(id, value),
            Err(e) => err(id, "internal", e.to_string()),
        },
        Err(message) => err(id, "command_failed", message),
    }
}

/// Like [`respond`], but a `None` result is a `not_found` error.
pub fn respond_found<T: Serialize>(
    id: &str,
    what: &str,
    result: Result<Option<T>, String>,
) -> Value {
    match result {
        Ok(None) => err(id, "not_found", format!("{what} not found")),
        Ok(Some(value)) => respond(id, Ok::<T, String>(value)),
        Err(message) => respond::<T>(id, Err(message)),
    }
}
