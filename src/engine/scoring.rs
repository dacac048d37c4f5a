use serde::Serialize;

use super::answers::AnswerContent;
use crate::models::surveys::entities::{QuestionDetail, QuestionType};

/// 单题评分结果，None 表示需要人工评分
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct AnswerScore {
    pub is_correct: Option<bool>,
    pub points_earned: Option<f64>,
}

impl AnswerScore {
    pub const UNGRADED: AnswerScore = AnswerScore {
        is_correct: None,
        points_earned: None,
    };

    fn graded(correct: bool, points: f64) -> Self {
        Self {
            is_correct: Some(correct),
            points_earned: Some(if correct { points } else { 0.0 }),
        }
    }

    pub fn is_graded(&self) -> bool {
        self.is_correct.is_some()
    }
}

/// 自动评分
///
/// 单选题与判断题按答案键判分，其余题型留给人工。
pub fn score_answer(question: &QuestionDetail, answer: &AnswerContent) -> AnswerScore {
    let points = question.question.points;

    match question.question_type() {
        QuestionType::MultipleChoice => {
            let correct = answer
                .selected_option_id()
                .and_then(|id| question.find_option(id))
                .is_some_and(|option| option.is_correct);
            AnswerScore::graded(correct, points)
        }
        QuestionType::TrueFalse => match question.correct_answer {
            Some(key) => AnswerScore::graded(answer.true_false_answer() == Some(key), points),
            None => AnswerScore::UNGRADED,
        },
        _ => AnswerScore::UNGRADED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::answers::tests::detail;

    #[test]
    fn test_multiple_choice() {
        // 第一个选项为正确答案
        let q = detail(1, QuestionType::MultipleChoice, &[10, 11]);
        assert_eq!(
            score_answer(&q, &AnswerContent::Choice(Some(10))),
            AnswerScore {
                is_correct: Some(true),
                points_earned: Some(2.0)
            }
        );
        assert_eq!(
            score_answer(&q, &AnswerContent::Choice(Some(11))),
            AnswerScore {
                is_correct: Some(false),
                points_earned: Some(0.0)
            }
        );
        assert_eq!(
            score_answer(&q, &AnswerContent::Choice(None)).is_correct,
            Some(false)
        );
    }

    #[test]
    fn test_true_false() {
        let mut q = detail(2, QuestionType::TrueFalse, &[]);
        q.correct_answer = Some(false);

        assert_eq!(
            score_answer(&q, &AnswerContent::TrueFalse(Some(false))).points_earned,
            Some(2.0)
        );
        assert_eq!(
            score_answer(&q, &AnswerContent::TrueFalse(Some(true))).is_correct,
            Some(false)
        );
        assert_eq!(
            score_answer(&q, &AnswerContent::TrueFalse(None)).is_correct,
            Some(false)
        );
    }

    #[test]
    fn test_true_false_without_key_is_ungraded() {
        let q = detail(2, QuestionType::TrueFalse, &[]);
        assert_eq!(
            score_answer(&q, &AnswerContent::TrueFalse(Some(true))),
            AnswerScore::UNGRADED
        );
    }

    #[test]
    fn test_manual_types_are_ungraded() {
        for question_type in [
            QuestionType::Likert,
            QuestionType::Essay,
            QuestionType::Enumeration,
        ] {
            let q = detail(3, question_type, &[30, 31]);
            let score = score_answer(&q, &AnswerContent::Text("anything".to_string()));
            assert!(!score.is_graded());
            assert_eq!(score.points_earned, None);
        }
    }
}
