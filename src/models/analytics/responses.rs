use serde::Serialize;
use ts_rs::TS;

use crate::models::surveys::entities::QuestionType;

/// 选项 / 判断题计数
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

/// 词云条目
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct WordFrequency {
    pub word: String,
    pub size: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub enum AnalyticsSummary {
    // 单选 / 量表 / 判断题
    Tally { counts: Vec<LabelCount> },
    // 问答 / 枚举题
    WordCloud {
        response_count: i64,
        words: Vec<WordFrequency>,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct QuestionAnalytics {
    pub question_id: i64,
    pub question_text: String,
    pub question_type: QuestionType,
    pub summary: AnalyticsSummary,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/analytics.ts")]
pub struct SurveyAnalytics {
    pub survey_id: i64,
    pub submitted_count: i64,
    pub questions: Vec<QuestionAnalytics>,
}
