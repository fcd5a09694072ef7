//! Demonstration dataset written on first run.

use chrono::{DateTime, TimeZone, Utc};

use super::models::{DefaultNode, ExamRecord, ExamType, TimeNode};

fn stamp(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 12, 5, hour, 0, 0)
        .single()
        .unwrap_or_default()
}

fn node(kind: DefaultNode, start: &str, end: &str) -> TimeNode {
    TimeNode::new(kind.id(), kind.label(), kind.initial_kind(), start, end)
}

pub fn sample_records() -> Vec<ExamRecord> {
    vec![
        ExamRecord {
            id: 1_701_234_567_890,
            exam_name: "2024年山东省公务员考试".into(),
            exam_type: ExamType::Civil,
            announcement_url: Some("https://gwy.shandong.gov.cn/announcement".into()),
            registration_url: Some("https://gwy.shandong.gov.cn/register".into()),
            time_nodes: vec![
                node(DefaultNode::Announcement, "2024-11-12T09:00", "2024-11-12T09:00"),
                node(DefaultNode::Registration, "2024-11-12T09:00", "2024-11-18T16:00"),
                node(DefaultNode::Payment, "2024-11-12T09:00", "2024-11-21T16:00"),
                node(DefaultNode::Admission, "2024-12-04T09:00", "2024-12-08T17:00"),
                node(DefaultNode::Written, "2024-12-07T14:00", "2024-12-08T16:30"),
            ],
            notes: Some("招考人数：9504人".into()),
            created_at: stamp(10),
            updated_at: stamp(10),
        },
        ExamRecord {
            id: 1_701_234_567_891,
            exam_name: "2024年教师资格考试(上半年)".into(),
            exam_type: ExamType::Teacher,
            announcement_url: Some("https://www.ntce.cn/announcement".into()),
            registration_url: Some("https://www.ntce.cn/register".into()),
            time_nodes: vec![
                node(DefaultNode::Registration, "2024-01-15T09:00", "2024-01-20T16:00"),
                node(DefaultNode::Payment, "2024-01-15T09:00", "2024-01-22T16:00"),
                node(DefaultNode::Admission, "2024-03-01T09:00", "2024-03-10T16:00"),
                node(DefaultNode::Written, "2024-03-16T09:00", "2024-03-17T16:00"),
            ],
            notes: Some("包含幼儿园、小学、初中、高中各学科类别".into()),
            created_at: stamp(11),
            updated_at: stamp(11),
        },
    ]
}
