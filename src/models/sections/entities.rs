use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 教师名下的班级（学生花名册）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/section.ts")]
pub struct Section {
    pub id: i64,
    pub teacher_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
