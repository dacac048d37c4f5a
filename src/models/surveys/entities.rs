use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 问卷状态：draft -> published -> closed（closed 为终态）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub enum SurveyStatus {
    Draft,     // 草稿
    Published, // 已发布
    Closed,    // 已关闭
}

impl SurveyStatus {
    pub const DRAFT: &'static str = "draft";
    pub const PUBLISHED: &'static str = "published";
    pub const CLOSED: &'static str = "closed";

    pub fn as_str(&self) -> &'static str {
        match self {
            SurveyStatus::Draft => Self::DRAFT,
            SurveyStatus::Published => Self::PUBLISHED,
            SurveyStatus::Closed => Self::CLOSED,
        }
    }
}

impl std::fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SurveyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::DRAFT => Ok(SurveyStatus::Draft),
            Self::PUBLISHED => Ok(SurveyStatus::Published),
            Self::CLOSED => Ok(SurveyStatus::Closed),
            _ => Err(format!("Invalid survey status: {s}")),
        }
    }
}

// 题型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub enum QuestionType {
    MultipleChoice, // 单选题
    Likert,         // 量表题
    TrueFalse,      // 判断题
    Essay,          // 问答题
    Enumeration,    // 枚举填空题
    Heading,        // 标题（展示用）
    Subheading,     // 副标题（展示用）
    Paragraph,      // 段落（展示用）
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::Likert => "likert",
            QuestionType::TrueFalse => "true_false",
            QuestionType::Essay => "essay",
            QuestionType::Enumeration => "enumeration",
            QuestionType::Heading => "heading",
            QuestionType::Subheading => "subheading",
            QuestionType::Paragraph => "paragraph",
        }
    }

    /// 展示用元素：不作答、不计分、不可必答
    pub fn is_presentational(&self) -> bool {
        matches!(
            self,
            QuestionType::Heading | QuestionType::Subheading | QuestionType::Paragraph
        )
    }

    /// 以选项作答的题型
    pub fn is_choice(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::Likert)
    }

    /// 可以挂载子条目的标题类元素
    pub fn accepts_items(&self) -> bool {
        matches!(self, QuestionType::Heading | QuestionType::Subheading)
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "likert" => Ok(QuestionType::Likert),
            "true_false" => Ok(QuestionType::TrueFalse),
            "essay" => Ok(QuestionType::Essay),
            "enumeration" => Ok(QuestionType::Enumeration),
            "heading" => Ok(QuestionType::Heading),
            "subheading" => Ok(QuestionType::Subheading),
            "paragraph" => Ok(QuestionType::Paragraph),
            _ => Err(format!("Invalid question type: {s}")),
        }
    }
}

// 题目上下文类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub enum ContextKind {
    Code,  // 代码片段
    Image, // 图片
}

impl std::fmt::Display for ContextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContextKind::Code => write!(f, "code"),
            ContextKind::Image => write!(f, "image"),
        }
    }
}

impl std::str::FromStr for ContextKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(ContextKind::Code),
            "image" => Ok(ContextKind::Image),
            _ => Err(format!("Invalid context kind: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct Survey {
    // 唯一 ID
    pub id: i64,
    // 所属教师
    pub teacher_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: SurveyStatus,
    // 题目分值之和，每次保存时重新计算
    pub total_points: f64,
    // 作答时限（分钟）
    pub time_limit: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    // 分配的班级
    pub section_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct Question {
    pub id: i64,
    pub survey_id: i64,
    pub question_type: QuestionType,
    pub question_text: String,
    // 排序位置；标题下的子条目使用小数位置
    pub position: f64,
    pub required: bool,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct ChoiceOption {
    pub id: i64,
    pub question_id: i64,
    pub option_text: String,
    pub is_correct: bool,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/survey.ts")]
pub struct QuestionContext {
    pub id: i64,
    pub question_id: i64,
    pub kind: ContextKind,
    pub content: String,
    pub language: Option<String>,
    pub position: i32,
}

/// 题目及其答案键
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionDetail {
    pub question: Question,
    pub options: Vec<ChoiceOption>,
    pub correct_answer: Option<bool>,
    pub enumeration_answers: Vec<String>,
    pub contexts: Vec<QuestionContext>,
}

impl QuestionDetail {
    pub fn id(&self) -> i64 {
        self.question.id
    }

    pub fn question_type(&self) -> QuestionType {
        self.question.question_type
    }

    /// 仅在本题自己的选项中查找
    pub fn find_option(&self, option_id: i64) -> Option<&ChoiceOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_type_round_trip() {
        for raw in [
            "multiple_choice",
            "likert",
            "true_false",
            "essay",
            "enumeration",
            "heading",
            "subheading",
            "paragraph",
        ] {
            let parsed: QuestionType = raw.parse().unwrap();
            assert_eq!(parsed.as_str(), raw);
            let json = serde_json::to_string(&parsed).unwrap();
            assert_eq!(json, format!("\"{raw}\""));
        }
    }

    #[test]
    fn test_presentational_types() {
        assert!(QuestionType::Heading.is_presentational());
        assert!(QuestionType::Paragraph.is_presentational());
        assert!(!QuestionType::Essay.is_presentational());
        assert!(QuestionType::Likert.is_choice());
        assert!(!QuestionType::TrueFalse.is_choice());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "published".parse::<SurveyStatus>().unwrap(),
            SurveyStatus::Published
        );
        assert!("archived".parse::<SurveyStatus>().is_err());
    }
}
