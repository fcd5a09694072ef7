pub mod exam;
pub mod time_node;
pub mod validation;

pub use exam::{ExamId, ExamRecord, ExamRecordInput, ExamRecordPatch, ExamType};
pub use time_node::{
    generate_custom_id, Boundary, DefaultNode, NodeKind, NodeOrigin, TimeNode, CUSTOM_ID_PREFIX,
    UNRANKED_PRIORITY,
};
