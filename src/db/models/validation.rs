//! Structural checks shared by every write path (add, update, import, paste).
//!
//! Field contents such as URL shape are left to the presentation layer.

use std::collections::HashSet;

use anyhow::{bail, Result};

use super::{generate_custom_id, ExamRecord, TimeNode};

pub fn validate_exam_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("examName is required");
    }
    Ok(())
}

/// Give blank ids a generated custom id, restore the single-node invariant
/// and the catalogue labels of default nodes, then reject duplicate ids.
pub fn prepare_time_nodes(nodes: Vec<TimeNode>, now_millis: i64) -> Result<Vec<TimeNode>> {
    let prepared: Vec<TimeNode> = nodes
        .into_iter()
        .map(|node| {
            let mut node = if node.id().trim().is_empty() {
                node.with_id(generate_custom_id(now_millis))
            } else {
                node
            };
            node.normalize();
            node
        })
        .collect();
    validate_time_nodes(&prepared)?;
    Ok(prepared)
}

pub fn validate_time_nodes(nodes: &[TimeNode]) -> Result<()> {
    let mut seen = HashSet::new();
    for node in nodes {
        if node.id().trim().is_empty() {
            bail!("time node '{}' has no id", node.label());
        }
        if !seen.insert(node.id()) {
            bail!("duplicate time node id '{}'", node.id());
        }
    }
    Ok(())
}

/// Checks for a whole collection about to replace the stored one.
pub fn validate_collection(records: &[ExamRecord]) -> Result<()> {
    let mut ids = HashSet::new();
    for record in records {
        validate_exam_name(&record.exam_name)?;
        if !ids.insert(record.id) {
            bail!("duplicate exam id {}", record.id);
        }
        validate_time_nodes(&record.time_nodes)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{NodeKind, NodeOrigin};

    #[test]
    fn blank_names_are_rejected() {
        assert!(validate_exam_name("  ").is_err());
        assert!(validate_exam_name("国考").is_ok());
    }

    #[test]
    fn prepare_assigns_ids_and_collapses_single_nodes() {
        let raw: Vec<TimeNode> = serde_json::from_value(serde_json::json!([
            {"label": "体检时间", "type": "single", "startTime": "2024-12-25T09:00", "endTime": "2024-12-26T09:00"},
            {"id": "written", "label": "笔试时间", "type": "range", "startTime": "2024-12-07T14:00", "endTime": "2024-12-08T16:30"}
        ]))
        .unwrap();

        let nodes = prepare_time_nodes(raw, 1_700_000_000_000).unwrap();
        assert!(nodes[0].id().starts_with("custom_1700000000000_"));
        assert_eq!(nodes[0].origin(), NodeOrigin::Custom);
        assert_eq!(nodes[0].kind(), NodeKind::Single);
        assert_eq!(nodes[0].end_time(), "2024-12-25T09:00");
        assert_eq!(nodes[1].id(), "written");
    }

    #[test]
    fn prepare_resets_relabelled_default_nodes() {
        let raw: Vec<TimeNode> = serde_json::from_value(serde_json::json!([
            {"id": "interview", "label": "复试", "type": "range", "startTime": "", "endTime": ""}
        ]))
        .unwrap();
        assert_eq!(raw[0].label(), "复试");

        let nodes = prepare_time_nodes(raw, 0).unwrap();
        assert_eq!(nodes[0].label(), "面试时间");
    }

    #[test]
    fn duplicate_node_ids_are_rejected() {
        let nodes = vec![
            TimeNode::range("written", "笔试时间", "", ""),
            TimeNode::range("written", "笔试时间", "", ""),
        ];
        let err = prepare_time_nodes(nodes, 0).unwrap_err();
        assert!(err.to_string().contains("duplicate time node id 'written'"));
    }
}
