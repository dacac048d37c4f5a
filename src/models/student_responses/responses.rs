use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::models::student_responses::entities::{QuestionAnswer, StudentResponse};

/// 作答详情
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/response.ts")]
pub struct ResponseDetail {
    pub response: StudentResponse,
    pub answers: Vec<QuestionAnswer>,
}

/// 未满足的必答题
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/response.ts")]
pub struct UnmetQuestion {
    pub question_id: i64,
    pub question_text: String,
    pub reason: String,
}

/// 提交被拒绝时返回的完整未答列表
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/response.ts")]
pub struct SubmissionIncomplete {
    pub unmet: Vec<UnmetQuestion>,
}

/// 提交结果
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Submitted(ResponseDetail),
    Incomplete(Vec<UnmetQuestion>),
}

/// 教师视角的作答概览
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/response.ts")]
pub struct ResponseSummary {
    pub id: i64,
    pub student_id: i64,
    pub is_submitted: bool,
    pub started_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub score: Option<f64>,
}

impl From<StudentResponse> for ResponseSummary {
    fn from(response: StudentResponse) -> Self {
        Self {
            id: response.id,
            student_id: response.student_id,
            is_submitted: response.is_submitted,
            started_at: response.started_at,
            submitted_at: response.submitted_at,
            score: response.score,
        }
    }
}

/// 批量评分结果
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/response.ts")]
pub struct GradingSummary {
    pub graded_responses: i64,
    pub graded_answers: i64,
}
