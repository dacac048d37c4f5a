use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/section.ts")]
pub struct CreateSectionRequest {
    pub name: String,
}

/// 教师把学生加入自己的班级
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/section.ts")]
pub struct EnrollStudentRequest {
    pub student_id: i64,
}
