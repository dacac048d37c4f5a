use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::pagination::PaginationQuery;
use crate::models::surveys::entities::{ContextKind, QuestionType, SurveyStatus};

/// 问卷编辑器保存请求（创建与整体保存共用）
///
/// `questions` 为 `None` 时只更新问卷元信息；为 `Some` 时整体替换题目。
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct SaveSurveyRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<SurveyStatus>,
    pub time_limit: Option<i32>,
    // datetime-local 或 ISO 8601 字符串，无法解析时视为未设置
    pub due_date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub sections: Vec<i64>,
    pub questions: Option<Vec<QuestionInput>>,
}

/// 单个题目
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct QuestionInput {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub required: bool,
    pub points: Option<f64>,
    // 单选 / 量表选项
    #[serde(default)]
    pub options: Vec<OptionInput>,
    // 判断题答案
    pub correct_answer: Option<bool>,
    // 枚举题可接受答案
    #[serde(default)]
    pub answers: Vec<String>,
    // 标题下的纯文本子条目
    #[serde(default)]
    pub items: Vec<ItemInput>,
    #[serde(default)]
    pub contexts: Vec<ContextInput>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct OptionInput {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// 子条目：可以是纯文本，也可以是读取问卷时返回的条目对象
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub enum ItemInput {
    Text(String),
    Item { text: String },
}

impl ItemInput {
    pub fn text(&self) -> &str {
        match self {
            ItemInput::Text(text) | ItemInput::Item { text } => text,
        }
    }
}

impl From<&str> for ItemInput {
    fn from(text: &str) -> Self {
        ItemInput::Text(text.to_string())
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct ContextInput {
    pub kind: ContextKind,
    pub content: String,
    pub language: Option<String>,
}

/// 问卷列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct SurveyListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<SurveyStatus>,
    pub search: Option<String>,
}

// 用于存储层的内部查询参数
#[derive(Debug, Clone)]
pub struct SurveyListQuery {
    pub pagination: PaginationQuery,
    pub status: Option<SurveyStatus>,
    pub search: Option<String>,
}

impl From<SurveyListParams> for SurveyListQuery {
    fn from(params: SurveyListParams) -> Self {
        Self {
            pagination: params.pagination,
            status: params.status,
            search: params.search,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_accept_text_and_objects() {
        let input: QuestionInput = serde_json::from_value(serde_json::json!({
            "type": "heading",
            "text": "Part I",
            "items": ["plain", {"id": 7, "text": "fetched", "order": 1.5}]
        }))
        .unwrap();
        let texts: Vec<&str> = input.items.iter().map(ItemInput::text).collect();
        assert_eq!(texts, vec!["plain", "fetched"]);
    }
}
