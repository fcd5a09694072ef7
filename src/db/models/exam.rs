//! Exam record data models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::time_node::TimeNode;

pub type ExamId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExamType {
    Civil,
    Teacher,
    Professional,
    Language,
    #[default]
    Other,
}

impl ExamType {
    pub const ALL: [ExamType; 5] = [
        ExamType::Civil,
        ExamType::Teacher,
        ExamType::Professional,
        ExamType::Language,
        ExamType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExamType::Civil => "civil",
            ExamType::Teacher => "teacher",
            ExamType::Professional => "professional",
            ExamType::Language => "language",
            ExamType::Other => "other",
        }
    }

    /// Unknown values fall back to `Other`, matching how they are displayed.
    pub fn parse(value: &str) -> Self {
        Self::from_wire(value).unwrap_or(ExamType::Other)
    }

    /// Exact wire name only.
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value.trim())
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExamType::Civil => "公务员",
            ExamType::Teacher => "教师资格",
            ExamType::Professional => "专业资格",
            ExamType::Language => "语言考试",
            ExamType::Other => "其他",
        }
    }

    /// Theme color token used for badges and calendar legends.
    pub fn color_token(&self) -> &'static str {
        match self {
            ExamType::Civil => "primary",
            ExamType::Teacher => "success",
            ExamType::Professional => "warning",
            ExamType::Language => "danger",
            ExamType::Other => "secondary",
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ExamType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ExamType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().map(ExamType::parse).unwrap_or_default())
    }
}

/// One tracked exam or application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamRecord {
    pub id: ExamId,
    pub exam_name: String,
    #[serde(default)]
    pub exam_type: ExamType,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "blank_as_none")]
    pub announcement_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "blank_as_none")]
    pub registration_url: Option<String>,
    #[serde(default)]
    pub time_nodes: Vec<TimeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "blank_as_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExamRecord {
    pub fn node(&self, id: &str) -> Option<&TimeNode> {
        self.time_nodes.iter().find(|node| node.id() == id)
    }
}

/// Fields supplied when creating a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamRecordInput {
    #[serde(default)]
    pub exam_name: String,
    #[serde(default)]
    pub exam_type: ExamType,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub announcement_url: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub registration_url: Option<String>,
    #[serde(default)]
    pub time_nodes: Vec<TimeNode>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub notes: Option<String>,
}

impl ExamRecordInput {
    pub fn new(exam_name: impl Into<String>, exam_type: ExamType) -> Self {
        Self {
            exam_name: exam_name.into(),
            exam_type,
            ..Self::default()
        }
    }

    pub fn with_nodes(mut self, time_nodes: Vec<TimeNode>) -> Self {
        self.time_nodes = time_nodes;
        self
    }
}

/// Merge-patch for an existing record. `None` keeps the stored value;
/// `timeNodes`, when present, replaces the whole list. An empty string clears
/// an optional text field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExamRecordPatch {
    pub exam_name: Option<String>,
    pub exam_type: Option<ExamType>,
    pub announcement_url: Option<String>,
    pub registration_url: Option<String>,
    pub time_nodes: Option<Vec<TimeNode>>,
    pub notes: Option<String>,
}

impl ExamRecordPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply_to(self, record: &mut ExamRecord) {
        if let Some(name) = self.exam_name {
            record.exam_name = name;
        }
        if let Some(kind) = self.exam_type {
            record.exam_type = kind;
        }
        if let Some(url) = self.announcement_url {
            record.announcement_url = non_blank(url);
        }
        if let Some(url) = self.registration_url {
            record.registration_url = non_blank(url);
        }
        if let Some(nodes) = self.time_nodes {
            record.time_nodes = nodes;
        }
        if let Some(notes) = self.notes {
            record.notes = non_blank(notes);
        }
    }
}

impl From<ExamRecordInput> for ExamRecordPatch {
    fn from(input: ExamRecordInput) -> Self {
        Self {
            exam_name: Some(input.exam_name),
            exam_type: Some(input.exam_type),
            announcement_url: Some(input.announcement_url.unwrap_or_default()),
            registration_url: Some(input.registration_url.unwrap_or_default()),
            time_nodes: Some(input.time_nodes),
            notes: Some(input.notes.unwrap_or_default()),
        }
    }
}

pub(crate) fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(non_blank))
}
