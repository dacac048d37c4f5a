use std::collections::HashMap;

use super::answers::AnswerContent;
use crate::models::student_responses::responses::UnmetQuestion;
use crate::models::surveys::entities::{QuestionDetail, QuestionType};

/// 提交前校验必答题
///
/// 返回全部未满足的必答题，空列表表示可以提交。
pub fn validate_for_submission(
    questions: &[QuestionDetail],
    answers: &HashMap<i64, AnswerContent>,
) -> Vec<UnmetQuestion> {
    questions
        .iter()
        .filter(|q| q.question.required && !q.question_type().is_presentational())
        .filter_map(|q| {
            let reason = unmet_reason(q.question_type(), answers.get(&q.id()))?;
            Some(UnmetQuestion {
                question_id: q.id(),
                question_text: q.question.question_text.clone(),
                reason: reason.to_string(),
            })
        })
        .collect()
}

fn unmet_reason(question_type: QuestionType, answer: Option<&AnswerContent>) -> Option<&'static str> {
    match question_type {
        QuestionType::MultipleChoice | QuestionType::Likert => answer
            .and_then(AnswerContent::selected_option_id)
            .is_none()
            .then_some("请选择一个选项"),
        QuestionType::TrueFalse => answer
            .and_then(AnswerContent::true_false_answer)
            .is_none()
            .then_some("请选择 true 或 false"),
        _ => {
            let filled = answer
                .and_then(AnswerContent::text_answer)
                .is_some_and(|text| !text.trim().is_empty());
            (!filled).then_some("请填写答案")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::answers::tests::detail;

    fn questions() -> Vec<QuestionDetail> {
        let mut optional = detail(4, QuestionType::Essay, &[]);
        optional.question.required = false;
        vec![
            detail(1, QuestionType::MultipleChoice, &[10, 11]),
            detail(2, QuestionType::TrueFalse, &[]),
            detail(3, QuestionType::Essay, &[]),
            optional,
            detail(5, QuestionType::Heading, &[]),
        ]
    }

    #[test]
    fn test_all_required_answered() {
        let mut answers = HashMap::new();
        answers.insert(1, AnswerContent::Choice(Some(10)));
        answers.insert(2, AnswerContent::TrueFalse(Some(false)));
        answers.insert(3, AnswerContent::Text("because".to_string()));

        assert!(validate_for_submission(&questions(), &answers).is_empty());
    }

    #[test]
    fn test_missing_choice_is_listed() {
        let mut answers = HashMap::new();
        answers.insert(1, AnswerContent::Choice(None));
        answers.insert(2, AnswerContent::TrueFalse(Some(true)));
        answers.insert(3, AnswerContent::Text("ok".to_string()));

        let unmet = validate_for_submission(&questions(), &answers);
        assert_eq!(unmet.len(), 1);
        assert_eq!(unmet[0].question_id, 1);
        assert_eq!(unmet[0].question_text, "Question 1");
    }

    #[test]
    fn test_reports_every_unmet_question() {
        let mut answers = HashMap::new();
        answers.insert(3, AnswerContent::Text("   ".to_string()));

        let unmet: Vec<i64> = validate_for_submission(&questions(), &answers)
            .into_iter()
            .map(|u| u.question_id)
            .collect();
        // 可选题与展示元素不参与校验
        assert_eq!(unmet, vec![1, 2, 3]);
    }
}
