//! Entry-form state for creating or editing one exam.

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

use super::paste::parse_pasted_nodes;
use crate::db::{
    helpers::{join_date_time, split_date_time},
    models::{
        exam::non_blank, generate_custom_id, Boundary, DefaultNode, ExamId, ExamRecord,
        ExamRecordInput, ExamType, NodeKind, TimeNode,
    },
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDraft {
    /// Record being edited; `None` for a new exam.
    pub editing: Option<ExamId>,
    pub exam_name: String,
    pub exam_type: ExamType,
    pub announcement_url: String,
    pub registration_url: String,
    pub notes: String,
    pub time_nodes: Vec<TimeNode>,
}

impl Default for ExamDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl ExamDraft {
    /// Blank form: civil service exam with the six default nodes.
    pub fn new() -> Self {
        Self {
            editing: None,
            exam_name: String::new(),
            exam_type: ExamType::Civil,
            announcement_url: String::new(),
            registration_url: String::new(),
            notes: String::new(),
            time_nodes: DefaultNode::ALL.into_iter().map(DefaultNode::blank).collect(),
        }
    }

    /// Edit form for an existing record. Default nodes the record lacks are
    /// appended after its own nodes.
    pub fn from_record(record: &ExamRecord) -> Self {
        let mut time_nodes = record.time_nodes.clone();
        let missing: Vec<TimeNode> = DefaultNode::ALL
            .into_iter()
            .filter(|kind| !time_nodes.iter().any(|node| node.default_kind() == Some(*kind)))
            .map(DefaultNode::blank)
            .collect();
        time_nodes.extend(missing);

        Self {
            editing: Some(record.id),
            exam_name: record.exam_name.clone(),
            exam_type: record.exam_type,
            announcement_url: record.announcement_url.clone().unwrap_or_default(),
            registration_url: record.registration_url.clone().unwrap_or_default(),
            notes: record.notes.clone().unwrap_or_default(),
            time_nodes,
        }
    }

    pub fn node(&self, id: &str) -> Option<&TimeNode> {
        self.time_nodes.iter().find(|node| node.id() == id)
    }

    /// Append an empty custom range node and return its id.
    pub fn add_custom_node(&mut self, now_millis: i64) -> String {
        let mut id = generate_custom_id(now_millis);
        while self.node(&id).is_some() {
            id = generate_custom_id(now_millis);
        }
        self.time_nodes
            .push(TimeNode::new(id.clone(), "", NodeKind::Range, "", ""));
        id
    }

    /// Remove a custom node. Default nodes stay on the form.
    pub fn remove_node(&mut self, id: &str) -> Result<()> {
        let node = self.node_mut(id)?;
        if !node.is_removable() {
            bail!("default time node '{id}' cannot be removed");
        }
        self.time_nodes.retain(|node| node.id() != id);
        Ok(())
    }

    pub fn set_node_label(&mut self, id: &str, label: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.set_label(label)
    }

    pub fn set_node_time(
        &mut self,
        id: &str,
        boundary: Boundary,
        value: impl Into<String>,
    ) -> Result<()> {
        self.node_mut(id)?.set_time(boundary, value);
        Ok(())
    }

    /// Change the date half of one boundary, keeping its time (or `00:00`).
    pub fn set_node_date(&mut self, id: &str, boundary: Boundary, date: &str) -> Result<()> {
        let node = self.node_mut(id)?;
        let (_, time) = split_date_time(node.time(boundary));
        let joined = join_date_time(date, time);
        node.set_time(boundary, joined);
        Ok(())
    }

    /// Change the time half of one boundary. Without a date there is nothing
    /// to attach it to, so the value stays empty.
    pub fn set_node_clock(&mut self, id: &str, boundary: Boundary, time: &str) -> Result<()> {
        let node = self.node_mut(id)?;
        let (date, _) = split_date_time(node.time(boundary));
        let joined = join_date_time(date, time);
        node.set_time(boundary, joined);
        Ok(())
    }

    pub fn toggle_node_kind(&mut self, id: &str) -> Result<NodeKind> {
        let node = self.node_mut(id)?;
        node.toggle_kind();
        Ok(node.kind())
    }

    /// Replace the form's nodes with a pasted JSON array. A bad paste leaves
    /// the draft as it was.
    pub fn apply_pasted_nodes(&mut self, text: &str, now_millis: i64) -> Result<usize> {
        let nodes = parse_pasted_nodes(text, now_millis)?;
        let count = nodes.len();
        self.time_nodes = nodes;
        Ok(count)
    }

    pub fn into_input(self) -> ExamRecordInput {
        ExamRecordInput {
            exam_name: self.exam_name,
            exam_type: self.exam_type,
            announcement_url: non_blank(self.announcement_url),
            registration_url: non_blank(self.registration_url),
            time_nodes: self.time_nodes,
            notes: non_blank(self.notes),
        }
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut TimeNode> {
        self.time_nodes
            .iter_mut()
            .find(|node| node.id() == id)
            .ok_or_else(|| anyhow!("no time node with id '{id}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const NOW: i64 = 1_717_200_000_000;

    #[test]
    fn new_draft_has_the_default_catalogue() {
        let draft = ExamDraft::new();
        let ids: Vec<_> = draft.time_nodes.iter().map(|n| n.id()).collect();
        assert_eq!(
            ids,
            ["announcement", "registration", "payment", "admission", "written", "interview"]
        );
        assert_eq!(draft.time_nodes[0].kind(), NodeKind::Single);
        assert_eq!(draft.exam_type, ExamType::Civil);
    }

    #[test]
    fn editing_appends_missing_defaults() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let record = ExamRecord {
            id: 5,
            exam_name: "国考".into(),
            exam_type: ExamType::Civil,
            announcement_url: Some("https://example.org/a".into()),
            registration_url: None,
            time_nodes: vec![
                TimeNode::range("custom_9", "资格审查", "2024-01-01T09:00", "2024-01-02T09:00"),
                TimeNode::range("written", "笔试时间", "2024-02-01T09:00", "2024-02-01T11:00"),
            ],
            notes: None,
            created_at: at,
            updated_at: at,
        };
        let draft = ExamDraft::from_record(&record);
        assert_eq!(draft.editing, Some(5));
        assert_eq!(draft.time_nodes.len(), 7);
        assert_eq!(draft.time_nodes[0].id(), "custom_9");
        assert_eq!(draft.time_nodes[1].id(), "written");
        assert_eq!(draft.time_nodes[2].id(), "announcement");
        assert_eq!(draft.announcement_url, "https://example.org/a");
    }

    #[test]
    fn only_custom_nodes_can_be_removed_or_renamed() {
        let mut draft = ExamDraft::new();
        let id = draft.add_custom_node(NOW);
        assert!(id.starts_with("custom_"));
        draft.set_node_label(&id, "体检").unwrap();
        assert_eq!(draft.node(&id).unwrap().label(), "体检");

        assert!(draft.remove_node("written").is_err());
        assert!(draft.set_node_label("written", "笔试").is_err());
        draft.remove_node(&id).unwrap();
        assert_eq!(draft.time_nodes.len(), 6);
        assert!(draft.remove_node("missing").is_err());
    }

    #[test]
    fn toggling_to_single_copies_start_into_end() {
        let mut draft = ExamDraft::new();
        draft.set_node_time("payment", Boundary::Start, "2024-03-01T09:00").unwrap();
        draft.set_node_time("payment", Boundary::End, "2024-03-05T17:00").unwrap();
        assert_eq!(draft.toggle_node_kind("payment").unwrap(), NodeKind::Single);
        let node = draft.node("payment").unwrap();
        assert_eq!(node.end_time(), "2024-03-01T09:00");

        // Editing a single node's start moves its end too.
        draft.set_node_time("payment", Boundary::Start, "2024-03-02T10:00").unwrap();
        assert_eq!(draft.node("payment").unwrap().end_time(), "2024-03-02T10:00");
    }

    #[test]
    fn date_and_time_halves_edit_independently() {
        let mut draft = ExamDraft::new();
        draft.set_node_clock("written", Boundary::Start, "09:30").unwrap();
        assert_eq!(draft.node("written").unwrap().start_time(), "");

        draft.set_node_date("written", Boundary::Start, "2024-11-30").unwrap();
        assert_eq!(draft.node("written").unwrap().start_time(), "2024-11-30T00:00");
        draft.set_node_clock("written", Boundary::Start, "09:30").unwrap();
        assert_eq!(draft.node("written").unwrap().start_time(), "2024-11-30T09:30");
        draft.set_node_date("written", Boundary::Start, "2024-12-01").unwrap();
        assert_eq!(draft.node("written").unwrap().start_time(), "2024-12-01T09:30");
    }

    #[test]
    fn bad_paste_leaves_the_draft_alone() {
        let mut draft = ExamDraft::new();
        assert!(draft.apply_pasted_nodes("[{\"label\": \"x\"}]", NOW).is_err());
        assert_eq!(draft.time_nodes.len(), 6);

        let applied = draft
            .apply_pasted_nodes(
                r#"[{"id": "interview", "label": "面试时间", "type": "range", "startTime": "2025-01-10T09:00"}]"#,
                NOW,
            )
            .unwrap();
        assert_eq!(applied, 1);
        assert_eq!(draft.time_nodes[0].id(), "interview");
    }

    #[test]
    fn into_input_drops_blank_optionals() {
        let mut draft = ExamDraft::new();
        draft.exam_name = "CPA".into();
        draft.notes = "  ".into();
        let input = draft.into_input();
        assert_eq!(input.exam_name, "CPA");
        assert_eq!(input.notes, None);
        assert_eq!(input.time_nodes.len(), 6);
    }
}
