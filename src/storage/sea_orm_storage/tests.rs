use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::{Value, json};

use super::SeaOrmStorage;
use crate::config::DatabaseConfig;
use crate::engine::answers::AnswerFields;
use crate::engine::builder::SurveyDraft;
use crate::entity::prelude::*;
use crate::errors::SurveyError;
use crate::models::analytics::responses::{AnalyticsSummary, LabelCount};
use crate::models::student_responses::responses::SubmitOutcome;
use crate::models::surveys::entities::{QuestionType, SurveyStatus};
use crate::models::surveys::requests::{SaveSurveyRequest, SurveyListQuery};
use crate::models::surveys::responses::SurveyDocument;

pub(crate) const TEACHER: i64 = 100;

pub(crate) struct TestDb {
    pub(crate) storage: SeaOrmStorage,
    path: std::path::PathBuf,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

pub(crate) async fn setup() -> TestDb {
    let path = std::env::temp_dir().join(format!("websurvey-test-{}.db", uuid::Uuid::new_v4()));
    let config = DatabaseConfig {
        url: path.display().to_string(),
        pool_size: 4,
        timeout: 10,
    };
    let storage = SeaOrmStorage::connect(&config).await.unwrap();
    TestDb { storage, path }
}

pub(crate) fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
}

fn draft(value: Value) -> SurveyDraft {
    let req: SaveSurveyRequest = serde_json::from_value(value).unwrap();
    SurveyDraft::from_request(req, FixedOffset::east_opt(0).unwrap()).unwrap()
}

fn fields(pairs: &[(i64, &str)]) -> AnswerFields {
    let mut fields = AnswerFields::default();
    for (question_id, value) in pairs {
        fields.insert(*question_id, *value);
    }
    fields
}

/// 创建一个班级并加入给定的学生
pub(crate) async fn section_with(storage: &SeaOrmStorage, students: &[i64]) -> i64 {
    let section = storage.create_section_impl(TEACHER, "Period 1").await.unwrap();
    for student in students {
        storage
            .enroll_student_impl(TEACHER, section.id, *student)
            .await
            .unwrap();
    }
    section.id
}

pub(crate) async fn published_survey(storage: &SeaOrmStorage, section_id: i64, extra: Value) -> SurveyDocument {
    let mut body = json!({
        "title": "Unit quiz",
        "status": "published",
        "sections": [section_id],
        "questions": [
            {
                "type": "multiple_choice",
                "text": "Pick the best",
                "required": true,
                "points": 2,
                "options": [
                    {"text": "A", "is_correct": true},
                    {"text": "B"}
                ]
            },
            {
                "type": "essay",
                "text": "Explain your choice",
                "required": false
            }
        ]
    });
    if let (Some(target), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
        for (key, value) in extra {
            target.insert(key.clone(), value.clone());
        }
    }
    storage
        .create_survey_impl(TEACHER, draft(body), t0())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_sweep_closes_only_overdue_published_surveys() {
    let db = setup().await;
    let s = &db.storage;
    let section = section_with(s, &[]).await;

    let past = published_survey(s, section, json!({"due_date": "2025-02-28T08:00:00Z"})).await;
    let future = published_survey(s, section, json!({"due_date": "2025-03-02T08:00:00Z"})).await;
    let no_due = published_survey(s, section, json!({})).await;
    let draft_past = published_survey(
        s,
        section,
        json!({"status": "draft", "due_date": "2025-02-28T08:00:00Z"}),
    )
    .await;

    assert_eq!(s.sweep_overdue_impl(t0()).await.unwrap(), 1);
    // 重复执行不再影响任何问卷
    assert_eq!(s.sweep_overdue_impl(t0()).await.unwrap(), 0);

    let status = |doc: Option<SurveyDocument>| doc.unwrap().survey.status;
    assert_eq!(
        status(s.get_survey_document_impl(TEACHER, past.survey.id).await.unwrap()),
        SurveyStatus::Closed
    );
    assert_eq!(
        status(s.get_survey_document_impl(TEACHER, future.survey.id).await.unwrap()),
        SurveyStatus::Published
    );
    assert_eq!(
        status(s.get_survey_document_impl(TEACHER, no_due.survey.id).await.unwrap()),
        SurveyStatus::Published
    );
    assert_eq!(
        status(s.get_survey_document_impl(TEACHER, draft_past.survey.id).await.unwrap()),
        SurveyStatus::Draft
    );
}

#[tokio::test]
async fn test_second_response_is_a_conflict() {
    let db = setup().await;
    let s = &db.storage;
    let section = section_with(s, &[1]).await;
    let doc = published_survey(s, section, json!({})).await;

    s.create_response_impl(doc.survey.id, 1, t0()).await.unwrap();
    let err = s
        .create_response_impl(doc.survey.id, 1, t0())
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::Conflict(_)));
}

#[tokio::test]
async fn test_builder_round_trip() {
    let db = setup().await;
    let s = &db.storage;
    let section = section_with(s, &[]).await;

    let created = s
        .create_survey_impl(
            TEACHER,
            draft(json!({
                "title": "Round trip",
                "sections": [section],
                "questions": [
                    {
                        "type": "multiple_choice",
                        "text": "Capital of France?",
                        "required": true,
                        "points": 2,
                        "options": [
                            {"text": "Paris", "is_correct": true},
                            {"text": "Lyon"}
                        ]
                    },
                    {
                        "type": "true_false",
                        "text": "Water is wet",
                        "correct_answer": true
                    },
                    {
                        "type": "enumeration",
                        "text": "Name two primes",
                        "points": 3,
                        "answers": ["2", "3"]
                    },
                    {
                        "type": "heading",
                        "text": "Bonus",
                        "items": ["Read carefully"]
                    }
                ]
            })),
            t0(),
        )
        .await
        .unwrap();

    let doc = s
        .get_survey_document_impl(TEACHER, created.survey.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(doc.survey.status, SurveyStatus::Draft);
    assert_eq!(doc.survey.section_ids, vec![section]);
    assert_eq!(doc.survey.total_points, 6.0);
    assert_eq!(doc.questions.len(), 4);

    let mc = &doc.questions[0];
    assert_eq!(mc.question_type, QuestionType::MultipleChoice);
    let options: Vec<(&str, bool)> = mc
        .options
        .iter()
        .map(|o| (o.text.as_str(), o.is_correct))
        .collect();
    assert_eq!(options, vec![("Paris", true), ("Lyon", false)]);

    assert_eq!(doc.questions[1].correct_answer, Some(true));
    assert_eq!(doc.questions[1].points, 1.0);
    assert_eq!(doc.questions[2].answers, vec!["2", "3"]);

    let heading = &doc.questions[3];
    assert_eq!(heading.items.len(), 1);
    assert_eq!(heading.items[0].text, "Read carefully");
    assert!(heading.items[0].order > 4.0 && heading.items[0].order < 5.0);
}

#[tokio::test]
async fn test_invalid_builder_save_writes_nothing() {
    let db = setup().await;
    let s = &db.storage;
    let doc = published_survey(s, section_with(s, &[]).await, json!({})).await;

    let req: SaveSurveyRequest = serde_json::from_value(json!({
        "title": "Broken",
        "questions": [
            {"type": "multiple_choice", "text": "Only one", "options": [{"text": "A"}]}
        ]
    }))
    .unwrap();
    assert!(SurveyDraft::from_request(req, FixedOffset::east_opt(0).unwrap()).is_err());

    let unchanged = s
        .get_survey_document_impl(TEACHER, doc.survey.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.survey.title, "Unit quiz");
    assert_eq!(unchanged.questions.len(), 2);
}

#[tokio::test]
async fn test_save_without_questions_keeps_them() {
    let db = setup().await;
    let s = &db.storage;
    let section = section_with(s, &[]).await;
    let doc = published_survey(s, section, json!({})).await;

    let saved = s
        .save_survey_impl(
            TEACHER,
            doc.survey.id,
            draft(json!({"title": "Renamed", "sections": [section]})),
            t0(),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(saved.survey.title, "Renamed");
    assert_eq!(saved.survey.status, SurveyStatus::Published);
    assert_eq!(saved.questions.len(), 2);
    assert_eq!(saved.survey.total_points, doc.survey.total_points);
}

#[tokio::test]
async fn test_other_teacher_cannot_see_survey() {
    let db = setup().await;
    let s = &db.storage;
    let doc = published_survey(s, section_with(s, &[]).await, json!({})).await;

    assert!(
        s.get_survey_document_impl(TEACHER + 1, doc.survey.id)
            .await
            .unwrap()
            .is_none()
    );
    assert!(!s.delete_survey_impl(TEACHER + 1, doc.survey.id).await.unwrap());
}

#[tokio::test]
async fn test_status_transitions() {
    let db = setup().await;
    let s = &db.storage;
    let section = section_with(s, &[]).await;
    let doc = published_survey(s, section, json!({"status": "draft"})).await;
    let id = doc.survey.id;

    let err = s
        .set_survey_status_impl(TEACHER, id, SurveyStatus::Closed, t0())
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::InvalidTransition(_)));

    let published = s
        .set_survey_status_impl(TEACHER, id, SurveyStatus::Published, t0())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(published.status, SurveyStatus::Published);

    let closed = s
        .set_survey_status_impl(TEACHER, id, SurveyStatus::Closed, t0())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(closed.status, SurveyStatus::Closed);

    assert!(
        s.set_survey_status_impl(TEACHER, id, SurveyStatus::Published, t0())
            .await
            .is_err()
    );
    let edit = s
        .save_survey_impl(TEACHER, id, draft(json!({"title": "Reopen"})), t0())
        .await;
    assert!(matches!(edit, Err(SurveyError::InvalidTransition(_))));
}

#[tokio::test]
async fn test_student_access_rules() {
    let db = setup().await;
    let s = &db.storage;
    let section = section_with(s, &[1]).await;
    let published = published_survey(s, section, json!({})).await;
    let hidden = published_survey(s, section, json!({"status": "draft"})).await;

    let view = s
        .get_student_survey_impl(1, published.survey.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view.questions.len(), 2);
    let key = format!("question_{}", view.questions[0].id);
    assert_eq!(view.questions[0].field_key.as_deref(), Some(key.as_str()));

    // 草稿与未分配的学生都视为不存在
    assert!(s.get_student_survey_impl(1, hidden.survey.id).await.unwrap().is_none());
    assert!(s.get_student_survey_impl(2, published.survey.id).await.unwrap().is_none());
    let err = s
        .save_draft_impl(2, published.survey.id, &fields(&[]), t0())
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::NotFound(_)));

    let listed = s
        .list_student_surveys_impl(
            1,
            SurveyListQuery {
                pagination: Default::default(),
                status: None,
                search: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.pagination.total, 1);
}

#[tokio::test]
async fn test_incomplete_submission_is_rolled_back() {
    let db = setup().await;
    let s = &db.storage;
    let section = section_with(s, &[1]).await;
    let doc = published_survey(s, section, json!({})).await;
    let essay = doc.questions[1].id;

    let outcome = s
        .submit_response_impl(1, doc.survey.id, &fields(&[(essay, "no choice made")]), t0())
        .await
        .unwrap();

    let SubmitOutcome::Incomplete(unmet) = outcome else {
        panic!("expected incomplete submission");
    };
    assert_eq!(unmet.len(), 1);
    assert_eq!(unmet[0].question_id, doc.questions[0].id);

    // 整体回滚，连作答记录也没有留下
    assert!(s.get_my_response_impl(1, doc.survey.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_draft_then_submit_is_one_way() {
    let db = setup().await;
    let s = &db.storage;
    let section = section_with(s, &[1]).await;
    let doc = published_survey(s, section, json!({})).await;
    let mc = &doc.questions[0];
    let essay = doc.questions[1].id;

    let draft = s
        .save_draft_impl(1, doc.survey.id, &fields(&[(essay, "  partial  ")]), t0())
        .await
        .unwrap();
    assert!(!draft.response.is_submitted);
    assert_eq!(draft.answers.len(), 2);
    let essay_answer = draft.answers.iter().find(|a| a.question_id == essay).unwrap();
    assert_eq!(essay_answer.text_answer.as_deref(), Some("partial"));

    let later = t0() + Duration::minutes(5);
    let answer = mc.options[1].id.to_string();
    let outcome = s
        .submit_response_impl(1, doc.survey.id, &fields(&[(mc.id, answer.as_str())]), later)
        .await
        .unwrap();
    let SubmitOutcome::Submitted(detail) = outcome else {
        panic!("expected submitted response");
    };
    assert!(detail.response.is_submitted);
    assert_eq!(detail.response.submitted_at, Some(later));
    assert_eq!(detail.response.started_at, t0());

    let err = s
        .save_draft_impl(1, doc.survey.id, &fields(&[]), later)
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::AlreadySubmitted(_)));
    let err = s
        .submit_response_impl(1, doc.survey.id, &fields(&[(mc.id, answer.as_str())]), later)
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::AlreadySubmitted(_)));
}

#[tokio::test]
async fn test_foreign_option_id_is_not_stored() {
    let db = setup().await;
    let s = &db.storage;
    let section = section_with(s, &[1]).await;
    let first = published_survey(s, section, json!({})).await;
    let second = published_survey(s, section, json!({})).await;

    let foreign = second.questions[0].options[0].id.to_string();
    let detail = s
        .save_draft_impl(
            1,
            first.survey.id,
            &fields(&[(first.questions[0].id, foreign.as_str())]),
            t0(),
        )
        .await
        .unwrap();

    let answer = detail
        .answers
        .iter()
        .find(|a| a.question_id == first.questions[0].id)
        .unwrap();
    assert_eq!(answer.selected_option_id, None);
}

#[tokio::test]
async fn test_type_switch_clears_stale_columns() {
    let db = setup().await;
    let s = &db.storage;
    let section = section_with(s, &[1]).await;
    let doc = published_survey(s, section, json!({})).await;
    let mc = &doc.questions[0];

    let option = mc.options[0].id.to_string();
    s.save_draft_impl(1, doc.survey.id, &fields(&[(mc.id, option.as_str())]), t0())
        .await
        .unwrap();

    // 直接把题型改为判断题，再次保存同一题
    let question = Questions::find_by_id(mc.id)
        .one(&s.db)
        .await
        .unwrap()
        .unwrap();
    let mut active: QuestionActiveModel = question.into();
    active.question_type = Set(QuestionType::TrueFalse.to_string());
    active.update(&s.db).await.unwrap();

    let detail = s
        .save_draft_impl(1, doc.survey.id, &fields(&[(mc.id, "false")]), t0())
        .await
        .unwrap();
    let answer = detail.answers.iter().find(|a| a.question_id == mc.id).unwrap();
    assert_eq!(answer.true_false_answer, Some(false));
    assert_eq!(answer.selected_option_id, None);
    assert_eq!(answer.text_answer, None);
}

#[tokio::test]
async fn test_switch_to_essay_keeps_only_text() {
    let db = setup().await;
    let s = &db.storage;
    let section = section_with(s, &[1]).await;
    let doc = published_survey(s, section, json!({})).await;
    let mc = &doc.questions[0];

    let option = mc.options[0].id.to_string();
    s.save_draft_impl(1, doc.survey.id, &fields(&[(mc.id, option.as_str())]), t0())
        .await
        .unwrap();

    // 单选题改为问答题后，选项与判断列都应为空
    let question = Questions::find_by_id(mc.id)
        .one(&s.db)
        .await
        .unwrap()
        .unwrap();
    let mut active: QuestionActiveModel = question.into();
    active.question_type = Set(QuestionType::Essay.to_string());
    active.update(&s.db).await.unwrap();

    let detail = s
        .save_draft_impl(
            1,
            doc.survey.id,
            &fields(&[(mc.id, "  free text answer ")]),
            t0(),
        )
        .await
        .unwrap();
    let answer = detail.answers.iter().find(|a| a.question_id == mc.id).unwrap();
    assert_eq!(answer.text_answer.as_deref(), Some("free text answer"));
    assert_eq!(answer.selected_option_id, None);
    assert_eq!(answer.true_false_answer, None);
}

#[tokio::test]
async fn test_analytics_counts_submitted_only() {
    let db = setup().await;
    let s = &db.storage;
    let students = [1, 2, 3, 4, 5, 6];
    let section = section_with(s, &students).await;
    let doc = published_survey(s, section, json!({})).await;
    let mc = &doc.questions[0];
    let a = mc.options[0].id.to_string();
    let b = mc.options[1].id.to_string();

    for (student, choice) in [(1, &a), (2, &b), (3, &a), (4, &b), (5, &a)] {
        let outcome = s
            .submit_response_impl(student, doc.survey.id, &fields(&[(mc.id, choice.as_str())]), t0())
            .await
            .unwrap();
        assert!(matches!(outcome, SubmitOutcome::Submitted(_)));
    }
    // 草稿不计入统计
    s.save_draft_impl(6, doc.survey.id, &fields(&[(mc.id, b.as_str())]), t0())
        .await
        .unwrap();

    let analytics = s
        .survey_analytics_impl(TEACHER, doc.survey.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(analytics.submitted_count, 5);
    // 问答题没有任何文本，不出现在结果中
    assert_eq!(analytics.questions.len(), 1);
    assert_eq!(
        analytics.questions[0].summary,
        AnalyticsSummary::Tally {
            counts: vec![
                LabelCount {
                    label: "A".to_string(),
                    count: 3
                },
                LabelCount {
                    label: "B".to_string(),
                    count: 2
                },
            ]
        }
    );
}

#[tokio::test]
async fn test_grading_writes_scores() {
    let db = setup().await;
    let s = &db.storage;
    let section = section_with(s, &[1, 2]).await;
    let doc = published_survey(s, section, json!({})).await;
    let mc = &doc.questions[0];
    let right = mc.options[0].id.to_string();
    let wrong = mc.options[1].id.to_string();

    for (student, choice) in [(1, &right), (2, &wrong)] {
        s.submit_response_impl(student, doc.survey.id, &fields(&[(mc.id, choice.as_str())]), t0())
            .await
            .unwrap();
    }

    let summary = s
        .grade_survey_impl(TEACHER, doc.survey.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(summary.graded_responses, 2);
    assert_eq!(summary.graded_answers, 2);

    let responses = s
        .list_responses_impl(TEACHER, doc.survey.id)
        .await
        .unwrap()
        .unwrap();
    let score_of = |student: i64| {
        responses
            .iter()
            .find(|r| r.student_id == student)
            .and_then(|r| r.score)
    };
    assert_eq!(score_of(1), Some(2.0));
    assert_eq!(score_of(2), Some(0.0));
}

#[tokio::test]
async fn test_past_due_survey_rejects_submission_after_sweep() {
    let db = setup().await;
    let s = &db.storage;
    let section = section_with(s, &[1]).await;
    let doc = published_survey(s, section, json!({"due_date": "2025-03-01T09:00:00Z"})).await;
    let mc = &doc.questions[0];
    let option = mc.options[0].id.to_string();

    let after_due = t0() + Duration::hours(2);
    assert_eq!(s.sweep_overdue_impl(after_due).await.unwrap(), 1);

    let doc_after = s
        .get_survey_document_impl(TEACHER, doc.survey.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(doc_after.survey.status, SurveyStatus::Closed);

    let err = s
        .submit_response_impl(1, doc.survey.id, &fields(&[(mc.id, option.as_str())]), after_due)
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::SurveyNotOpen(_)));

    // 关闭后仍可查看（这里没有作答记录）
    assert!(s.get_my_response_impl(1, doc.survey.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_enrolling_twice_is_a_conflict() {
    let db = setup().await;
    let s = &db.storage;
    let section = section_with(s, &[1]).await;

    let err = s.enroll_student_impl(TEACHER, section, 1).await.unwrap_err();
    assert!(matches!(err, SurveyError::Conflict(_)));
}

#[tokio::test]
async fn test_enrolling_into_another_teachers_section_is_not_found() {
    let db = setup().await;
    let s = &db.storage;
    let section = section_with(s, &[]).await;

    let err = s
        .enroll_student_impl(TEACHER + 1, section, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::NotFound(_)));

    // 不存在的班级同样是 NotFound
    let err = s
        .enroll_student_impl(TEACHER, section + 1000, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::NotFound(_)));
}
