use chrono::{DateTime, Utc};

use crate::errors::{Result, SurveyError};
use crate::models::surveys::entities::{Survey, SurveyStatus};

/// 计算状态迁移
///
/// 只允许 draft -> published -> closed，相同状态视为无操作。
pub fn transition(current: SurveyStatus, target: SurveyStatus) -> Result<SurveyStatus> {
    use SurveyStatus::*;

    match (current, target) {
        (from, to) if from == to => Ok(to),
        (Draft, Published) | (Published, Closed) => Ok(target),
        (Closed, _) => Err(SurveyError::invalid_transition(
            "问卷已关闭，无法再变更状态",
        )),
        (from, to) => Err(SurveyError::invalid_transition(format!(
            "不允许的状态变更: {from} -> {to}"
        ))),
    }
}

/// 已发布且截止时间已过
pub fn is_overdue(survey: &Survey, now: DateTime<Utc>) -> bool {
    survey.status == SurveyStatus::Published && survey.due_date.is_some_and(|due| due <= now)
}

/// 判断问卷当前是否接受新的作答或提交
pub fn ensure_accepting_answers(survey: &Survey, now: DateTime<Utc>) -> Result<()> {
    match survey.status {
        SurveyStatus::Draft => return Err(SurveyError::not_found("问卷不存在")),
        SurveyStatus::Closed => return Err(SurveyError::survey_not_open("问卷已关闭")),
        SurveyStatus::Published => {}
    }

    if is_overdue(survey, now) {
        return Err(SurveyError::survey_not_open("问卷已过截止时间"));
    }
    if let Some(start) = survey.start_date
        && now < start
    {
        return Err(SurveyError::survey_not_open("问卷尚未开放作答"));
    }
    if let Some(end) = survey.end_date
        && now > end
    {
        return Err(SurveyError::survey_not_open("问卷作答时间已结束"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn survey(status: SurveyStatus) -> Survey {
        let now = Utc::now();
        Survey {
            id: 1,
            teacher_id: 1,
            title: "Weekly check-in".to_string(),
            description: None,
            status,
            total_points: 0.0,
            time_limit: None,
            due_date: None,
            start_date: None,
            end_date: None,
            section_ids: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_forward_transitions() {
        assert_eq!(
            transition(SurveyStatus::Draft, SurveyStatus::Published).unwrap(),
            SurveyStatus::Published
        );
        assert_eq!(
            transition(SurveyStatus::Published, SurveyStatus::Closed).unwrap(),
            SurveyStatus::Closed
        );
        assert_eq!(
            transition(SurveyStatus::Draft, SurveyStatus::Draft).unwrap(),
            SurveyStatus::Draft
        );
    }

    #[test]
    fn test_rejected_transitions() {
        assert!(transition(SurveyStatus::Draft, SurveyStatus::Closed).is_err());
        assert!(transition(SurveyStatus::Published, SurveyStatus::Draft).is_err());
        assert!(transition(SurveyStatus::Closed, SurveyStatus::Published).is_err());
        assert!(transition(SurveyStatus::Closed, SurveyStatus::Draft).is_err());
    }

    #[test]
    fn test_closed_is_terminal_even_for_same_status() {
        assert_eq!(
            transition(SurveyStatus::Closed, SurveyStatus::Closed).unwrap(),
            SurveyStatus::Closed
        );
    }

    #[test]
    fn test_overdue_only_for_published() {
        let now = Utc::now();
        let mut s = survey(SurveyStatus::Published);
        s.due_date = Some(now - Duration::minutes(1));
        assert!(is_overdue(&s, now));

        s.due_date = Some(now + Duration::minutes(1));
        assert!(!is_overdue(&s, now));

        s.due_date = None;
        assert!(!is_overdue(&s, now));

        let mut draft = survey(SurveyStatus::Draft);
        draft.due_date = Some(now - Duration::minutes(1));
        assert!(!is_overdue(&draft, now));
    }

    #[test]
    fn test_accepting_answers_window() {
        let now = Utc::now();
        let mut s = survey(SurveyStatus::Published);
        assert!(ensure_accepting_answers(&s, now).is_ok());

        s.start_date = Some(now + Duration::hours(1));
        assert!(matches!(
            ensure_accepting_answers(&s, now),
            Err(SurveyError::SurveyNotOpen(_))
        ));

        s.start_date = None;
        s.end_date = Some(now - Duration::hours(1));
        assert!(matches!(
            ensure_accepting_answers(&s, now),
            Err(SurveyError::SurveyNotOpen(_))
        ));

        s.end_date = None;
        s.due_date = Some(now);
        assert!(ensure_accepting_answers(&s, now).is_err());
    }

    #[test]
    fn test_closed_and_draft_reject_answers() {
        let now = Utc::now();
        assert!(matches!(
            ensure_accepting_answers(&survey(SurveyStatus::Closed), now),
            Err(SurveyError::SurveyNotOpen(_))
        ));
        assert!(matches!(
            ensure_accepting_answers(&survey(SurveyStatus::Draft), now),
            Err(SurveyError::NotFound(_))
        ));
    }
}
