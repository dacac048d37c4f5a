//! 问卷编辑器文档的校验与排布
//!
//! 保存时先把请求整体规划成 `SurveyPlan`，全部题目通过校验后才写库；
//! 读取时再把题目行折叠回与请求一致的文档结构。

use chrono::{DateTime, FixedOffset, Utc};

use super::answers::field_key;
use crate::errors::{Result, SurveyError};
use crate::models::surveys::entities::{ContextKind, QuestionDetail, QuestionType, SurveyStatus};
use crate::models::surveys::requests::{QuestionInput, SaveSurveyRequest};
use crate::utils::datetime::parse_due_date;
use crate::models::surveys::responses::{
    ContextView, ItemView, OptionView, QuestionView, StudentOptionView, StudentQuestionView,
};

// 可作答题目未指定分值时的默认分值
const DEFAULT_POINTS: f64 = 1.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedOption {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedContext {
    pub kind: ContextKind,
    pub content: String,
    pub language: Option<String>,
}

/// 待写入的一行题目
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedQuestion {
    pub question_type: QuestionType,
    pub text: String,
    pub required: bool,
    pub points: f64,
    pub position: f64,
    pub options: Vec<PlannedOption>,
    pub correct_answer: Option<bool>,
    pub answers: Vec<String>,
    pub contexts: Vec<PlannedContext>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurveyPlan {
    pub questions: Vec<PlannedQuestion>,
    pub total_points: f64,
}

/// 校验通过、可以直接写库的保存请求
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<SurveyStatus>,
    pub time_limit: Option<i32>,
    pub due_date: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub section_ids: Vec<i64>,
    // None 表示保留现有题目
    pub plan: Option<SurveyPlan>,
}

impl SurveyDraft {
    pub fn from_request(req: SaveSurveyRequest, offset: FixedOffset) -> Result<Self> {
        let mut errors = Vec::new();

        let title = req.title.trim().to_string();
        if title.is_empty() {
            errors.push("问卷标题不能为空".to_string());
        }
        if req.time_limit.is_some_and(|minutes| minutes <= 0) {
            errors.push("作答时限必须大于 0 分钟".to_string());
        }

        let due_date = parse_due_date(req.due_date.as_deref(), offset);
        let start_date = parse_due_date(req.start_date.as_deref(), offset);
        let end_date = parse_due_date(req.end_date.as_deref(), offset);
        if let (Some(start), Some(end)) = (start_date, end_date)
            && start > end
        {
            errors.push("开始时间不能晚于结束时间".to_string());
        }

        let plan = match req.questions.as_deref().map(plan_questions) {
            Some(Ok(plan)) => Some(plan),
            Some(Err(e)) => {
                errors.push(e.message().to_string());
                None
            }
            None => None,
        };

        if !errors.is_empty() {
            return Err(SurveyError::validation(errors.join("; ")));
        }

        let mut section_ids = req.sections;
        section_ids.sort_unstable();
        section_ids.dedup();

        Ok(Self {
            title,
            description: req
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            status: req.status,
            time_limit: req.time_limit,
            due_date,
            start_date,
            end_date,
            section_ids,
            plan,
        })
    }
}

/// 校验并规划题目
///
/// 所有错误一次性收集返回，任何一题不合法时整个保存失败。
pub fn plan_questions(inputs: &[QuestionInput]) -> Result<SurveyPlan> {
    let mut errors = Vec::new();
    let mut questions = Vec::new();

    for (index, input) in inputs.iter().enumerate() {
        let number = index + 1;
        let problems = check_question(input);
        if !problems.is_empty() {
            errors.extend(problems.into_iter().map(|p| format!("第 {number} 题: {p}")));
            continue;
        }

        let position = number as f64;
        questions.push(plan_one(input, position));

        // 标题下的子条目以段落保存，位置落在本题与下一题之间
        let item_count = input.items.len() as f64;
        for (j, item) in input.items.iter().enumerate() {
            questions.push(PlannedQuestion {
                question_type: QuestionType::Paragraph,
                text: item.text().trim().to_string(),
                required: false,
                points: 0.0,
                position: position + (j as f64 + 1.0) / (item_count + 1.0),
                options: vec![],
                correct_answer: None,
                answers: vec![],
                contexts: vec![],
            });
        }
    }

    if !errors.is_empty() {
        return Err(SurveyError::validation(errors.join("; ")));
    }

    let total_points = questions.iter().map(|q| q.points).sum();
    Ok(SurveyPlan {
        questions,
        total_points,
    })
}

fn check_question(input: &QuestionInput) -> Vec<String> {
    let mut problems = Vec::new();
    let question_type = input.question_type;

    if input.text.trim().is_empty() {
        problems.push("题目内容不能为空".to_string());
    }

    if let Some(points) = input.points
        && (!points.is_finite() || points < 0.0)
    {
        problems.push("分值必须是非负数".to_string());
    }

    let options: Vec<&str> = input
        .options
        .iter()
        .map(|o| o.text.trim())
        .filter(|t| !t.is_empty())
        .collect();

    match question_type {
        QuestionType::MultipleChoice => {
            if options.len() < 2 {
                problems.push("单选题至少需要两个选项".to_string());
            }
            if !input
                .options
                .iter()
                .any(|o| o.is_correct && !o.text.trim().is_empty())
            {
                problems.push("单选题需要指定正确选项".to_string());
            }
        }
        QuestionType::Likert => {
            if options.len() < 2 {
                problems.push("量表题至少需要两个刻度".to_string());
            }
        }
        QuestionType::TrueFalse => {
            if input.correct_answer.is_none() {
                problems.push("判断题需要指定正确答案".to_string());
            }
        }
        QuestionType::Enumeration => {
            if !input.answers.iter().any(|a| !a.trim().is_empty()) {
                problems.push("枚举题至少需要一个可接受答案".to_string());
            }
        }
        _ => {}
    }

    if !input.items.is_empty() && !question_type.accepts_items() {
        problems.push(format!("{question_type} 不支持子条目"));
    }
    if input.items.iter().any(|item| item.text().trim().is_empty()) {
        problems.push("子条目内容不能为空".to_string());
    }
    if input.contexts.iter().any(|c| c.content.trim().is_empty()) {
        problems.push("上下文内容不能为空".to_string());
    }

    problems
}

fn plan_one(input: &QuestionInput, position: f64) -> PlannedQuestion {
    let question_type = input.question_type;
    let presentational = question_type.is_presentational();

    let options = if question_type.is_choice() {
        input
            .options
            .iter()
            .filter(|o| !o.text.trim().is_empty())
            .map(|o| PlannedOption {
                text: o.text.trim().to_string(),
                // 量表题没有正确答案
                is_correct: question_type == QuestionType::MultipleChoice && o.is_correct,
            })
            .collect()
    } else {
        vec![]
    };

    let answers = if question_type == QuestionType::Enumeration {
        input
            .answers
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        vec![]
    };

    let contexts = input
        .contexts
        .iter()
        .map(|c| PlannedContext {
            kind: c.kind,
            content: c.content.clone(),
            language: match c.kind {
                ContextKind::Code => c.language.clone().filter(|l| !l.trim().is_empty()),
                ContextKind::Image => None,
            },
        })
        .collect();

    PlannedQuestion {
        question_type,
        text: input.text.trim().to_string(),
        required: !presentational && input.required,
        points: if presentational {
            0.0
        } else {
            input.points.unwrap_or(DEFAULT_POINTS)
        },
        position,
        options,
        correct_answer: if question_type == QuestionType::TrueFalse {
            input.correct_answer
        } else {
            None
        },
        answers,
        contexts,
    }
}

// 小数位置的段落属于前一个标题的子条目
fn is_item_row(detail: &QuestionDetail) -> bool {
    detail.question_type() == QuestionType::Paragraph && detail.question.position.fract() != 0.0
}

fn context_views(detail: &QuestionDetail) -> Vec<ContextView> {
    detail
        .contexts
        .iter()
        .map(|c| ContextView {
            kind: c.kind,
            content: c.content.clone(),
            language: c.language.clone(),
        })
        .collect()
}

fn item_view(detail: &QuestionDetail) -> ItemView {
    ItemView {
        id: detail.id(),
        text: detail.question.question_text.clone(),
        order: detail.question.position,
    }
}

/// 将题目行折叠为编辑器文档（教师视角）
///
/// `details` 需按位置排序。
pub fn assemble_views(details: &[QuestionDetail]) -> Vec<QuestionView> {
    let mut views: Vec<QuestionView> = Vec::new();

    for detail in details {
        if is_item_row(detail)
            && let Some(parent) = views.last_mut()
            && parent.question_type.accepts_items()
        {
            parent.items.push(item_view(detail));
            continue;
        }

        views.push(QuestionView {
            id: detail.id(),
            question_type: detail.question_type(),
            text: detail.question.question_text.clone(),
            required: detail.question.required,
            points: detail.question.points,
            order: detail.question.position,
            options: detail
                .options
                .iter()
                .map(|o| OptionView {
                    id: o.id,
                    text: o.option_text.clone(),
                    is_correct: o.is_correct,
                })
                .collect(),
            correct_answer: detail.correct_answer,
            answers: detail.enumeration_answers.clone(),
            items: vec![],
            contexts: context_views(detail),
        });
    }

    views
}

/// 学生视角的题目，不包含任何答案键
pub fn assemble_student_views(details: &[QuestionDetail]) -> Vec<StudentQuestionView> {
    let mut views: Vec<StudentQuestionView> = Vec::new();

    for detail in details {
        if is_item_row(detail)
            && let Some(parent) = views.last_mut()
            && parent.question_type.accepts_items()
        {
            parent.items.push(item_view(detail));
            continue;
        }

        let question_type = detail.question_type();
        views.push(StudentQuestionView {
            id: detail.id(),
            question_type,
            text: detail.question.question_text.clone(),
            required: detail.question.required,
            points: detail.question.points,
            order: detail.question.position,
            field_key: (!question_type.is_presentational()).then(|| field_key(detail.id())),
            options: detail
                .options
                .iter()
                .map(|o| StudentOptionView {
                    id: o.id,
                    text: o.option_text.clone(),
                })
                .collect(),
            items: vec![],
            contexts: context_views(detail),
        });
    }

    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::surveys::entities::Question;
    use crate::models::surveys::requests::{ContextInput, OptionInput};

    fn input(question_type: QuestionType, text: &str) -> QuestionInput {
        QuestionInput {
            question_type,
            text: text.to_string(),
            required: true,
            points: None,
            options: vec![],
            correct_answer: None,
            answers: vec![],
            items: vec![],
            contexts: vec![],
        }
    }

    fn option(text: &str, is_correct: bool) -> OptionInput {
        OptionInput {
            text: text.to_string(),
            is_correct,
        }
    }

    #[test]
    fn test_plan_positions_and_total() {
        let mut mc = input(QuestionType::MultipleChoice, "Pick one");
        mc.options = vec![option("A", true), option("B", false)];
        mc.points = Some(3.0);
        let mut tf = input(QuestionType::TrueFalse, "Sky is blue");
        tf.correct_answer = Some(true);
        let mut heading = input(QuestionType::Heading, "Part II");
        heading.items = vec!["first".into(), "second".into()];
        heading.required = true;

        let plan = plan_questions(&[mc, tf, heading]).unwrap();

        let positions: Vec<f64> = plan.questions.iter().map(|q| q.position).collect();
        assert_eq!(positions.len(), 5);
        assert_eq!(&positions[..3], &[1.0, 2.0, 3.0]);
        assert!((positions[3] - (3.0 + 1.0 / 3.0)).abs() < 1e-9);
        assert!((positions[4] - (3.0 + 2.0 / 3.0)).abs() < 1e-9);

        // 展示元素不计分、不必答
        assert_eq!(plan.questions[2].points, 0.0);
        assert!(!plan.questions[2].required);
        assert_eq!(plan.questions[3].question_type, QuestionType::Paragraph);
        assert_eq!(plan.total_points, 4.0);
    }

    #[test]
    fn test_collects_every_error() {
        let mut mc = input(QuestionType::MultipleChoice, "Pick one");
        mc.options = vec![option("A", false)];
        let tf = input(QuestionType::TrueFalse, "");
        let enumeration = input(QuestionType::Enumeration, "List");

        let err = plan_questions(&[mc, tf, enumeration]).unwrap_err();
        let message = err.message();
        assert!(matches!(err, SurveyError::Validation(_)));
        assert!(message.contains("第 1 题"));
        assert!(message.contains("第 2 题"));
        assert!(message.contains("第 3 题"));
    }

    #[test]
    fn test_rejects_negative_points_and_stray_items() {
        let mut essay = input(QuestionType::Essay, "Explain");
        essay.points = Some(-1.0);
        essay.items = vec!["not allowed".into()];

        let err = plan_questions(&[essay]).unwrap_err();
        assert!(err.message().contains("分值"));
        assert!(err.message().contains("子条目"));
    }

    #[test]
    fn test_likert_options_are_never_correct() {
        let mut likert = input(QuestionType::Likert, "Rate");
        likert.options = vec![option("Low", true), option("High", false)];

        let plan = plan_questions(&[likert]).unwrap();
        assert!(plan.questions[0].options.iter().all(|o| !o.is_correct));
    }

    #[test]
    fn test_image_context_drops_language() {
        let mut essay = input(QuestionType::Essay, "Describe");
        essay.contexts = vec![
            ContextInput {
                kind: ContextKind::Image,
                content: "https://example.com/a.png".to_string(),
                language: Some("python".to_string()),
            },
            ContextInput {
                kind: ContextKind::Code,
                content: "print(1)".to_string(),
                language: Some("python".to_string()),
            },
        ];

        let plan = plan_questions(&[essay]).unwrap();
        assert_eq!(plan.questions[0].contexts[0].language, None);
        assert_eq!(
            plan.questions[0].contexts[1].language.as_deref(),
            Some("python")
        );
    }

    fn request(questions: Option<Vec<QuestionInput>>) -> SaveSurveyRequest {
        SaveSurveyRequest {
            title: "  Midterm feedback ".to_string(),
            description: Some("   ".to_string()),
            status: None,
            time_limit: None,
            due_date: Some("2025-03-01T10:00".to_string()),
            start_date: Some("not a date".to_string()),
            end_date: None,
            sections: vec![3, 1, 3],
            questions,
        }
    }

    #[test]
    fn test_draft_normalizes_request() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let draft = SurveyDraft::from_request(request(None), offset).unwrap();

        assert_eq!(draft.title, "Midterm feedback");
        assert_eq!(draft.description, None);
        assert_eq!(draft.section_ids, vec![1, 3]);
        assert!(draft.due_date.is_some());
        // 无法解析的日期视为未设置
        assert_eq!(draft.start_date, None);
        assert!(draft.plan.is_none());
    }

    #[test]
    fn test_draft_reports_meta_and_question_errors_together() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let mut req = request(Some(vec![input(QuestionType::TrueFalse, "Is it?")]));
        req.title = " ".to_string();

        let err = SurveyDraft::from_request(req, offset).unwrap_err();
        assert!(err.message().contains("标题"));
        assert!(err.message().contains("第 1 题"));
    }

    fn row(id: i64, question_type: QuestionType, position: f64) -> QuestionDetail {
        QuestionDetail {
            question: Question {
                id,
                survey_id: 1,
                question_type,
                question_text: format!("row {id}"),
                position,
                required: false,
                points: 0.0,
            },
            options: vec![],
            correct_answer: None,
            enumeration_answers: vec![],
            contexts: vec![],
        }
    }

    #[test]
    fn test_items_fold_under_heading() {
        let details = vec![
            row(1, QuestionType::Heading, 1.0),
            row(2, QuestionType::Paragraph, 1.5),
            row(3, QuestionType::Paragraph, 2.0),
            row(4, QuestionType::Essay, 3.0),
        ];

        let views = assemble_views(&details);
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].items.len(), 1);
        assert_eq!(views[0].items[0].id, 2);
        assert_eq!(views[1].question_type, QuestionType::Paragraph);

        let student = assemble_student_views(&details);
        assert_eq!(student[0].field_key, None);
        assert_eq!(student[2].field_key.as_deref(), Some("question_4"));
    }

    #[test]
    fn test_fetched_document_can_be_saved_again() {
        let details = vec![
            row(1, QuestionType::Heading, 1.0),
            row(2, QuestionType::Paragraph, 1.5),
            row(3, QuestionType::Paragraph, 2.0),
            row(4, QuestionType::Essay, 3.0),
        ];

        let fetched = serde_json::to_value(assemble_views(&details)).unwrap();
        let inputs: Vec<QuestionInput> = serde_json::from_value(fetched).unwrap();
        let plan = plan_questions(&inputs).unwrap();

        let rows: Vec<(QuestionType, &str, f64)> = plan
            .questions
            .iter()
            .map(|q| (q.question_type, q.text.as_str(), q.position))
            .collect();
        assert_eq!(
            rows,
            vec![
                (QuestionType::Heading, "row 1", 1.0),
                (QuestionType::Paragraph, "row 2", 1.5),
                (QuestionType::Paragraph, "row 3", 2.0),
                (QuestionType::Essay, "row 4", 3.0),
            ]
        );
    }
}
