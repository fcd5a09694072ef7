//! Newline-delimited JSON requests on stdin, one JSON response per line on
//! stdout.

mod error;
mod handlers;
mod helpers;
mod router;
mod types;

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::AppState;

pub use router::handle_request;
pub use types::Request;

/// Response for one input line; blank lines get none.
pub fn handle_line(state: &AppState, line: &str) -> Option<Value> {
    if line.trim().is_empty() {
        return None;
    }
    let resp = match serde_json::from_str::<Request>(line) {
        Ok(req) => handle_request(state, req),
        Err(e) => error::bad_json(e.to_string()),
    };
    Some(resp)
}

/// Serve requests until `input` is exhausted.
pub fn serve(state: &AppState, input: impl BufRead, mut output: impl Write) -> Result<()> {
    for line in input.lines() {
        let line = line.context("failed to read request line")?;
        let Some(resp) = handle_line(state, &line) else {
            continue;
        };
        let body = serde_json::to_string(&resp).context("failed to serialize response")?;
        writeln!(output, "{body}").context("failed to write response")?;
        output.flush().context("failed to flush response")?;
    }
    Ok(())
}
