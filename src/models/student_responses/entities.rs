use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 学生对一份问卷的作答（每个学生每份问卷唯一）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/response.ts")]
pub struct StudentResponse {
    pub id: i64,
    pub survey_id: i64,
    pub student_id: i64,
    pub is_submitted: bool,
    pub started_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub score: Option<f64>,
}

/// 单题答案
///
/// 根据题型只会填写 `selected_option_id`、`true_false_answer`、`text_answer` 中的一个。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/response.ts")]
pub struct QuestionAnswer {
    pub id: i64,
    pub response_id: i64,
    pub question_id: i64,
    pub selected_option_id: Option<i64>,
    pub true_false_answer: Option<bool>,
    pub text_answer: Option<String>,
    // 自动或人工评分结果，未评分时为空
    pub is_correct: Option<bool>,
    pub points_earned: Option<f64>,
}
