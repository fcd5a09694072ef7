//! Bulk time-node entry from pasted JSON.

use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::db::models::{
    generate_custom_id, validation::validate_time_nodes, DefaultNode, NodeKind, TimeNode,
};

/// Parse a pasted JSON array of nodes.
///
/// Every element needs a non-empty `label`, `type` and `startTime`. Ids from
/// the default catalogue are kept; anything else gets a fresh custom id so a
/// paste can never collide with nodes the user added by hand.
pub fn parse_pasted_nodes(text: &str, now_millis: i64) -> Result<Vec<TimeNode>> {
    if text.trim().is_empty() {
        bail!("time node data is empty");
    }
    let value: Value = serde_json::from_str(text).context("time node data is not valid JSON")?;
    let Value::Array(items) = value else {
        bail!("time node data must be an array");
    };

    let mut seen_defaults = HashSet::new();
    let mut nodes = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let label = required_text(item, "label", index)?;
        let kind = match required_text(item, "type", index)? {
            "single" => NodeKind::Single,
            "range" => NodeKind::Range,
            other => bail!("time node {index}: unknown type '{other}'"),
        };
        let start = required_text(item, "startTime", index)?;
        let end = item.get("endTime").and_then(Value::as_str).unwrap_or_default();

        let id = match item.get("id").and_then(Value::as_str).and_then(DefaultNode::from_id) {
            Some(default) => {
                if !seen_defaults.insert(default) {
                    bail!("duplicate time node id '{}'", default.id());
                }
                default.id().to_string()
            }
            None => generate_custom_id(now_millis),
        };
        nodes.push(TimeNode::new(id, label, kind, start, end));
    }

    validate_time_nodes(&nodes)?;
    Ok(nodes)
}

fn required_text<'a>(item: &'a Value, field: &str, index: usize) -> Result<&'a str> {
    match item.get(field).and_then(Value::as_str).map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => bail!("time node {index} is incomplete: label, type and startTime are required"),
    }
}
