use serde::Serialize;
use ts_rs::TS;

use crate::models::PaginationInfo;
use crate::models::surveys::entities::{ContextKind, QuestionType, Survey};

#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct OptionView {
    pub id: i64,
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct ItemView {
    pub id: i64,
    pub text: String,
    pub order: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct ContextView {
    pub kind: ContextKind,
    pub content: String,
    pub language: Option<String>,
}

/// 教师视角的题目（包含答案键），结构与保存请求一致
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct QuestionView {
    pub id: i64,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub text: String,
    pub required: bool,
    pub points: f64,
    pub order: f64,
    pub options: Vec<OptionView>,
    pub correct_answer: Option<bool>,
    pub answers: Vec<String>,
    pub items: Vec<ItemView>,
    pub contexts: Vec<ContextView>,
}

/// 问卷完整文档
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct SurveyDocument {
    pub survey: Survey,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct StudentOptionView {
    pub id: i64,
    pub text: String,
}

/// 学生视角的题目：不包含任何答案键
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct StudentQuestionView {
    pub id: i64,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub text: String,
    pub required: bool,
    pub points: f64,
    pub order: f64,
    // 提交答案时使用的字段名
    pub field_key: Option<String>,
    pub options: Vec<StudentOptionView>,
    pub items: Vec<ItemView>,
    pub contexts: Vec<ContextView>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct StudentSurveyDocument {
    pub survey: Survey,
    pub questions: Vec<StudentQuestionView>,
}

/// 问卷列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct SurveyListResponse {
    pub items: Vec<Survey>,
    pub pagination: PaginationInfo,
}
