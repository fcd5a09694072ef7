//! Time-node data model.
//!
//! A time node is one dated milestone inside an exam record. Nodes have no
//! identity outside their owning record.

use rand::{distributions::Uniform, Rng};
use serde::{Deserialize, Serialize};

/// Prefix of generated ids for user-added nodes.
pub const CUSTOM_ID_PREFIX: &str = "custom_";

/// Calendar priority of anything that is not a recognised default node.
pub const UNRANKED_PRIORITY: u8 = 99;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Fresh id for a user-added node: `custom_<millis>_<9 base-36 chars>`.
pub fn generate_custom_id(now_millis: i64) -> String {
    let mut rng = rand::thread_rng();
    let picks = Uniform::from(0..BASE36.len());
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.sample(picks)] as char)
        .collect();
    format!("{CUSTOM_ID_PREFIX}{now_millis}_{suffix}")
}

/// The six milestones every new exam starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DefaultNode {
    Announcement,
    Registration,
    Payment,
    Admission,
    Written,
    Interview,
}

impl DefaultNode {
    /// Entry-form order.
    pub const ALL: [DefaultNode; 6] = [
        DefaultNode::Announcement,
        DefaultNode::Registration,
        DefaultNode::Payment,
        DefaultNode::Admission,
        DefaultNode::Written,
        DefaultNode::Interview,
    ];

    pub fn id(self) -> &'static str {
        match self {
            DefaultNode::Announcement => "announcement",
            DefaultNode::Registration => "registration",
            DefaultNode::Payment => "payment",
            DefaultNode::Admission => "admission",
            DefaultNode::Written => "written",
            DefaultNode::Interview => "interview",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DefaultNode::Announcement => "公告发布",
            DefaultNode::Registration => "网上报名",
            DefaultNode::Payment => "网上缴费",
            DefaultNode::Admission => "准考证打印",
            DefaultNode::Written => "笔试时间",
            DefaultNode::Interview => "面试时间",
        }
    }

    pub fn initial_kind(self) -> NodeKind {
        match self {
            DefaultNode::Announcement => NodeKind::Single,
            _ => NodeKind::Range,
        }
    }

    /// Lower sorts first inside a calendar day.
    pub fn calendar_priority(self) -> u8 {
        match self {
            DefaultNode::Written => 1,
            DefaultNode::Interview => 2,
            DefaultNode::Admission => 3,
            DefaultNode::Registration => 4,
            DefaultNode::Payment => 5,
            DefaultNode::Announcement => 6,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|node| node.id() == id)
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|node| node.label() == label)
    }

    /// Empty node of this kind, as placed on a fresh entry form.
    pub fn blank(self) -> TimeNode {
        TimeNode::new(self.id(), self.label(), self.initial_kind(), "", "")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// One instant; start and end are always equal.
    Single,
    #[default]
    Range,
}

impl NodeKind {
    pub fn toggled(self) -> Self {
        match self {
            NodeKind::Single => NodeKind::Range,
            NodeKind::Range => NodeKind::Single,
        }
    }
}

/// Whether a node belongs to the fixed catalogue or was added by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeOrigin {
    Default,
    Custom,
}

impl NodeOrigin {
    pub fn of_id(id: &str) -> Self {
        if DefaultNode::from_id(id).is_some() {
            NodeOrigin::Default
        } else {
            NodeOrigin::Custom
        }
    }
}

/// Which end of a node a mutation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Boundary {
    Start,
    End,
}

/// A dated milestone. Times are kept as the raw local date-time strings the
/// user entered (`YYYY-MM-DDTHH:MM`); empty means "not set".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TimeNodeRecord", into = "TimeNodeRecord")]
pub struct TimeNode {
    id: String,
    label: String,
    kind: NodeKind,
    start_time: String,
    end_time: String,
    origin: NodeOrigin,
}

impl TimeNode {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: NodeKind,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let mut node = Self {
            origin: NodeOrigin::of_id(&id),
            id,
            label: label.into(),
            kind,
            start_time: start_time.into(),
            end_time: end_time.into(),
        };
        node.normalize();
        node
    }

    pub fn single(id: impl Into<String>, label: impl Into<String>, at: impl Into<String>) -> Self {
        let at = at.into();
        Self::new(id, label, NodeKind::Single, at.clone(), at)
    }

    pub fn range(
        id: impl Into<String>,
        label: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self::new(id, label, NodeKind::Range, start_time, end_time)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn start_time(&self) -> &str {
        &self.start_time
    }

    pub fn end_time(&self) -> &str {
        &self.end_time
    }

    pub fn origin(&self) -> NodeOrigin {
        self.origin
    }

    pub fn is_removable(&self) -> bool {
        self.origin == NodeOrigin::Custom
    }

    /// Default-node kind by id, falling back to the label for legacy data
    /// whose ids are plain numbers.
    pub fn default_kind(&self) -> Option<DefaultNode> {
        DefaultNode::from_id(&self.id).or_else(|| DefaultNode::from_label(&self.label))
    }

    pub fn calendar_priority(&self) -> u8 {
        self.default_kind()
            .map(DefaultNode::calendar_priority)
            .unwrap_or(UNRANKED_PRIORITY)
    }

    pub fn has_times(&self) -> bool {
        !self.start_time.trim().is_empty() && !self.end_time.trim().is_empty()
    }

    pub fn time(&self, boundary: Boundary) -> &str {
        match boundary {
            Boundary::Start => &self.start_time,
            Boundary::End => &self.end_time,
        }
    }

    /// Set one end of the node. On a single node both ends move together.
    pub fn set_time(&mut self, boundary: Boundary, value: impl Into<String>) {
        let value = value.into();
        match (self.kind, boundary) {
            (NodeKind::Single, _) => {
                self.start_time = value.clone();
                self.end_time = value;
            }
            (NodeKind::Range, Boundary::Start) => self.start_time = value,
            (NodeKind::Range, Boundary::End) => self.end_time = value,
        }
    }

    pub fn set_start_time(&mut self, value: impl Into<String>) {
        self.set_time(Boundary::Start, value);
    }

    pub fn set_end_time(&mut self, value: impl Into<String>) {
        self.set_time(Boundary::End, value);
    }

    /// Switching to single collapses the end onto the start.
    pub fn set_kind(&mut self, kind: NodeKind) {
        self.kind = kind;
        self.normalize();
    }

    pub fn toggle_kind(&mut self) {
        self.set_kind(self.kind.toggled());
    }

    /// Rename a custom node. Default nodes keep their catalogue label.
    pub fn set_label(&mut self, label: impl Into<String>) -> anyhow::Result<()> {
        if self.origin == NodeOrigin::Default {
            anyhow::bail!("label of default time node '{}' cannot be changed", self.id);
        }
        self.label = label.into();
        Ok(())
    }

    pub(crate) fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self.origin = NodeOrigin::of_id(&self.id);
        self
    }

    /// Restore `single ⟹ start == end` and pin default nodes to their
    /// catalogue label.
    pub(crate) fn normalize(&mut self) {
        if self.kind == NodeKind::Single && self.end_time != self.start_time {
            self.end_time = self.start_time.clone();
        }
        if let Some(default) = DefaultNode::from_id(&self.id) {
            if self.label != default.label() {
                self.label = default.label().to_string();
            }
        }
    }
}

/// Wire shape of a node inside the persisted document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeNodeRecord {
    #[serde(default, deserialize_with = "id_from_text_or_number")]
    id: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    label: String,
    #[serde(rename = "type", default, deserialize_with = "kind_or_range")]
    kind: NodeKind,
    #[serde(default, deserialize_with = "text_or_empty")]
    start_time: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    end_time: String,
}

impl From<TimeNodeRecord> for TimeNode {
    // Stored data is taken as-is; normalisation happens on mutation paths.
    fn from(record: TimeNodeRecord) -> Self {
        Self {
            origin: NodeOrigin::of_id(&record.id),
            id: record.id,
            label: record.label,
            kind: record.kind,
            start_time: record.start_time,
            end_time: record.end_time,
        }
    }
}

impl From<TimeNode> for TimeNodeRecord {
    fn from(node: TimeNode) -> Self {
        Self {
            id: node.id,
            label: node.label,
            kind: node.kind,
            start_time: node.start_time,
            end_time: node.end_time,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseId {
    Text(String),
    Number(serde_json::Number),
}

fn id_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let id = Option::<LooseId>::deserialize(deserializer)?;
    Ok(match id {
        Some(LooseId::Text(text)) => text,
        Some(LooseId::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

/// Anything other than `"single"` (missing, null, unknown) reads as a range.
fn kind_or_range<'de, D>(deserializer: D) -> Result<NodeKind, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let kind = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match kind.as_ref().and_then(serde_json::Value::as_str) {
        Some("single") => NodeKind::Single,
        _ => NodeKind::Range,
    })
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
