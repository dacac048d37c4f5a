use serde::Deserialize;
use std::collections::HashMap;
use ts_rs::TS;

// 作答动作
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/response.ts")]
pub enum AnswerAction {
    SaveDraft, // 保存草稿
    Submit,    // 正式提交
}

/// 学生提交答案请求
///
/// `answers` 的键为题目字段名（`question_<id>`），值为选项 ID、`true`/`false` 或文本。
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/response.ts")]
pub struct SubmitAnswersRequest {
    pub action: AnswerAction,
    #[serde(default)]
    pub answers: HashMap<String, serde_json::Value>,
}
