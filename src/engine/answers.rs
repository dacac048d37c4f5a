use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

use crate::models::student_responses::entities::QuestionAnswer;
use crate::models::surveys::entities::{QuestionDetail, QuestionType};

const FIELD_PREFIX: &str = "question_";

static FIELD_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^question_(\d+)$").expect("Invalid field key regex"));

/// 题目在答案表单中的字段名
pub fn field_key(question_id: i64) -> String {
    format!("{FIELD_PREFIX}{question_id}")
}

/// 从字段名解析题目 ID，不符合 `question_<id>` 格式的返回 None
pub fn parse_field_key(key: &str) -> Option<i64> {
    FIELD_KEY_RE
        .captures(key)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// 学生提交的原始答案字段
///
/// 键为题目 ID，值统一为字符串；缺失的字段按空值处理。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerFields {
    values: HashMap<i64, String>,
}

impl AnswerFields {
    pub fn from_json(raw: &HashMap<String, Value>) -> Self {
        let values = raw
            .iter()
            .filter_map(|(key, value)| {
                let question_id = parse_field_key(key)?;
                Some((question_id, json_to_field(value)))
            })
            .collect();
        Self { values }
    }

    pub fn insert(&mut self, question_id: i64, value: impl Into<String>) {
        self.values.insert(question_id, value.into());
    }

    pub fn get(&self, question_id: i64) -> &str {
        self.values.get(&question_id).map(String::as_str).unwrap_or("")
    }
}

fn json_to_field(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// 按题型归一化后的答案内容
///
/// 每个分支只对应一个存储列，写入时其余两列一律清空。
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerContent {
    Choice(Option<i64>),
    TrueFalse(Option<bool>),
    Text(String),
}

impl AnswerContent {
    pub fn selected_option_id(&self) -> Option<i64> {
        match self {
            AnswerContent::Choice(id) => *id,
            _ => None,
        }
    }

    pub fn true_false_answer(&self) -> Option<bool> {
        match self {
            AnswerContent::TrueFalse(value) => *value,
            _ => None,
        }
    }

    pub fn text_answer(&self) -> Option<String> {
        match self {
            AnswerContent::Text(text) => Some(text.clone()),
            _ => None,
        }
    }

    /// 从已保存的答案行恢复内容
    pub fn from_stored(question_type: QuestionType, answer: &QuestionAnswer) -> Self {
        match question_type {
            QuestionType::MultipleChoice | QuestionType::Likert => {
                AnswerContent::Choice(answer.selected_option_id)
            }
            QuestionType::TrueFalse => AnswerContent::TrueFalse(answer.true_false_answer),
            _ => AnswerContent::Text(answer.text_answer.clone().unwrap_or_default()),
        }
    }
}

/// 将原始字段值路由为对应题型的答案内容
///
/// 展示用元素不保存答案，返回 None。
pub fn route_answer(question: &QuestionDetail, raw: &str) -> Option<AnswerContent> {
    let question_type = question.question_type();
    if question_type.is_presentational() {
        return None;
    }

    let content = match question_type {
        QuestionType::MultipleChoice | QuestionType::Likert => {
            // 只接受本题自己的选项
            let selected = raw
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(|id| question.find_option(id))
                .map(|option| option.id);
            AnswerContent::Choice(selected)
        }
        QuestionType::TrueFalse => AnswerContent::TrueFalse(match raw.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }),
        _ => AnswerContent::Text(raw.trim().to_string()),
    };

    Some(content)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::surveys::entities::{ChoiceOption, Question};

    pub(crate) fn detail(id: i64, question_type: QuestionType, option_ids: &[i64]) -> QuestionDetail {
        QuestionDetail {
            question: Question {
                id,
                survey_id: 1,
                question_type,
                question_text: format!("Question {id}"),
                position: id as f64,
                required: true,
                points: 2.0,
            },
            options: option_ids
                .iter()
                .enumerate()
                .map(|(i, option_id)| ChoiceOption {
                    id: *option_id,
                    question_id: id,
                    option_text: format!("Option {option_id}"),
                    is_correct: i == 0,
                    position: i as i32,
                })
                .collect(),
            correct_answer: None,
            enumeration_answers: vec![],
            contexts: vec![],
        }
    }

    #[test]
    fn test_field_key_round_trip() {
        assert_eq!(field_key(42), "question_42");
        assert_eq!(parse_field_key("question_42"), Some(42));
        assert_eq!(parse_field_key("question_"), None);
        assert_eq!(parse_field_key("answer_42"), None);
        assert_eq!(parse_field_key("question_42_extra"), None);
    }

    #[test]
    fn test_fields_from_json() {
        let mut raw = HashMap::new();
        raw.insert("question_1".to_string(), Value::from(7));
        raw.insert("question_2".to_string(), Value::Bool(true));
        raw.insert("question_3".to_string(), Value::Null);
        raw.insert("csrf_token".to_string(), Value::from("abc"));

        let fields = AnswerFields::from_json(&raw);
        assert_eq!(fields.get(1), "7");
        assert_eq!(fields.get(2), "true");
        assert_eq!(fields.get(3), "");
        assert_eq!(fields.get(99), "");
    }

    #[test]
    fn test_choice_resolves_only_own_options() {
        let q = detail(1, QuestionType::MultipleChoice, &[10, 11]);
        assert_eq!(route_answer(&q, "11"), Some(AnswerContent::Choice(Some(11))));
        // 其他题目的选项 ID
        assert_eq!(route_answer(&q, "20"), Some(AnswerContent::Choice(None)));
        assert_eq!(route_answer(&q, "abc"), Some(AnswerContent::Choice(None)));
        assert_eq!(route_answer(&q, ""), Some(AnswerContent::Choice(None)));
    }

    #[test]
    fn test_true_false_accepts_exact_tokens() {
        let q = detail(2, QuestionType::TrueFalse, &[]);
        assert_eq!(
            route_answer(&q, "true"),
            Some(AnswerContent::TrueFalse(Some(true)))
        );
        assert_eq!(
            route_answer(&q, "false"),
            Some(AnswerContent::TrueFalse(Some(false)))
        );
        assert_eq!(route_answer(&q, "yes"), Some(AnswerContent::TrueFalse(None)));
        assert_eq!(route_answer(&q, "True"), Some(AnswerContent::TrueFalse(None)));
    }

    #[test]
    fn test_text_is_trimmed() {
        let q = detail(3, QuestionType::Essay, &[]);
        assert_eq!(
            route_answer(&q, "  hello world \n"),
            Some(AnswerContent::Text("hello world".to_string()))
        );
    }

    #[test]
    fn test_presentational_is_skipped() {
        let q = detail(4, QuestionType::Heading, &[]);
        assert_eq!(route_answer(&q, "anything"), None);
    }

    #[test]
    fn test_content_owns_a_single_column() {
        let choice = AnswerContent::Choice(Some(3));
        assert_eq!(choice.selected_option_id(), Some(3));
        assert_eq!(choice.true_false_answer(), None);
        assert_eq!(choice.text_answer(), None);

        let text = AnswerContent::Text("abc".to_string());
        assert_eq!(text.selected_option_id(), None);
        assert_eq!(text.text_answer().as_deref(), Some("abc"));
    }
}
