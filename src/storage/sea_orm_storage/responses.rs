//! 学生作答存储操作

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::surveys::{find_owned_survey, find_visible_survey, load_question_details, to_survey};
use crate::engine::answers::{AnswerContent, AnswerFields, route_answer};
use crate::engine::{lifecycle, scoring, validation};
use crate::entity::prelude::*;
use crate::entity::{question_answers, student_responses};
use crate::errors::{Result, SurveyError};
use crate::models::{
    student_responses::responses::{GradingSummary, ResponseDetail, ResponseSummary, SubmitOutcome},
    surveys::entities::QuestionDetail,
};

impl SeaOrmStorage {
    /// 直接创建作答记录，正常流程在首次保存答案时创建
    #[cfg(test)]
    pub(crate) async fn create_response_impl(
        &self,
        survey_id: i64,
        student_id: i64,
        now: DateTime<Utc>,
    ) -> Result<crate::models::student_responses::entities::StudentResponse> {
        Surveys::find_by_id(survey_id)
            .one(&self.db)
            .await
            .map_err(|e| SurveyError::database_operation(format!("查询问卷失败: {e}")))?
            .ok_or_else(|| SurveyError::not_found("问卷不存在"))?;

        let model = insert_response(&self.db, survey_id, student_id, now).await?;
        Ok(model.into_student_response())
    }

    /// 保存草稿
    pub async fn save_draft_impl(
        &self,
        student_id: i64,
        survey_id: i64,
        fields: &AnswerFields,
        now: DateTime<Utc>,
    ) -> Result<ResponseDetail> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SurveyError::database_operation(format!("开启事务失败: {e}")))?;

        let applied = apply_answers(&txn, student_id, survey_id, fields, now).await?;

        txn.commit()
            .await
            .map_err(|e| SurveyError::database_operation(format!("提交事务失败: {e}")))?;

        debug!(
            "学生 {} 保存问卷 {} 的草稿，共 {} 题",
            student_id,
            survey_id,
            applied.contents.len()
        );

        load_response_detail(&self.db, applied.response).await
    }

    /// 正式提交
    ///
    /// 先按草稿写入答案再校验必答题，不满足时整体回滚并返回未答列表。
    pub async fn submit_response_impl(
        &self,
        student_id: i64,
        survey_id: i64,
        fields: &AnswerFields,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SurveyError::database_operation(format!("开启事务失败: {e}")))?;

        let applied = apply_answers(&txn, student_id, survey_id, fields, now).await?;

        let unmet = validation::validate_for_submission(&applied.questions, &applied.contents);
        if !unmet.is_empty() {
            txn.rollback()
                .await
                .map_err(|e| SurveyError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(SubmitOutcome::Incomplete(unmet));
        }

        let mut model: StudentResponseActiveModel = applied.response.into();
        model.is_submitted = Set(true);
        model.submitted_at = Set(Some(now.timestamp()));
        let response = model
            .update(&txn)
            .await
            .map_err(|e| SurveyError::database_operation(format!("提交作答失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SurveyError::database_operation(format!("提交事务失败: {e}")))?;

        info!("学生 {} 提交问卷 {}", student_id, survey_id);

        Ok(SubmitOutcome::Submitted(
            load_response_detail(&self.db, response).await?,
        ))
    }

    /// 获取学生自己的作答，问卷关闭后仍可查看
    pub async fn get_my_response_impl(
        &self,
        student_id: i64,
        survey_id: i64,
    ) -> Result<Option<ResponseDetail>> {
        if find_visible_survey(&self.db, student_id, survey_id)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        match find_response(&self.db, survey_id, student_id).await? {
            Some(response) => Ok(Some(load_response_detail(&self.db, response).await?)),
            None => Ok(None),
        }
    }

    /// 列出问卷的全部作答
    pub async fn list_responses_impl(
        &self,
        teacher_id: i64,
        survey_id: i64,
    ) -> Result<Option<Vec<ResponseSummary>>> {
        if find_owned_survey(&self.db, teacher_id, survey_id)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        let responses = StudentResponses::find()
            .filter(student_responses::Column::SurveyId.eq(survey_id))
            .order_by_asc(student_responses::Column::StartedAt)
            .order_by_asc(student_responses::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SurveyError::database_operation(format!("查询作答列表失败: {e}")))?;

        Ok(Some(
            responses
                .into_iter()
                .map(|m| ResponseSummary::from(m.into_student_response()))
                .collect(),
        ))
    }

    /// 对已提交的作答自动评分
    ///
    /// 只写入可自动评分的题目，人工评分的结果保持不变；总分为所有已知得分之和。
    pub async fn grade_survey_impl(
        &self,
        teacher_id: i64,
        survey_id: i64,
    ) -> Result<Option<GradingSummary>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SurveyError::database_operation(format!("开启事务失败: {e}")))?;

        if find_owned_survey(&txn, teacher_id, survey_id)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        let questions = load_question_details(&txn, survey_id).await?;
        let by_id: HashMap<i64, &QuestionDetail> = questions.iter().map(|q| (q.id(), q)).collect();

        let responses = StudentResponses::find()
            .filter(student_responses::Column::SurveyId.eq(survey_id))
            .filter(student_responses::Column::IsSubmitted.eq(true))
            .all(&txn)
            .await
            .map_err(|e| SurveyError::database_operation(format!("查询作答列表失败: {e}")))?;

        let mut summary = GradingSummary {
            graded_responses: 0,
            graded_answers: 0,
        };

        for response in responses {
            let answers = QuestionAnswers::find()
                .filter(question_answers::Column::ResponseId.eq(response.id))
                .all(&txn)
                .await
                .map_err(|e| SurveyError::database_operation(format!("查询答案失败: {e}")))?;

            let mut total = 0.0;
            for answer in answers {
                let Some(question) = by_id.get(&answer.question_id) else {
                    continue;
                };

                let stored = answer.clone().into_question_answer();
                let content = AnswerContent::from_stored(question.question_type(), &stored);
                let score = scoring::score_answer(question, &content);

                if score.is_graded() {
                    let mut model: QuestionAnswerActiveModel = answer.into();
                    model.is_correct = Set(score.is_correct);
                    model.points_earned = Set(score.points_earned);
                    model
                        .update(&txn)
                        .await
                        .map_err(|e| SurveyError::database_operation(format!("写入评分失败: {e}")))?;
                    summary.graded_answers += 1;
                    total += score.points_earned.unwrap_or(0.0);
                } else {
                    total += stored.points_earned.unwrap_or(0.0);
                }
            }

            let mut model: StudentResponseActiveModel = response.into();
            model.score = Set(Some(total));
            model
                .update(&txn)
                .await
                .map_err(|e| SurveyError::database_operation(format!("写入总分失败: {e}")))?;
            summary.graded_responses += 1;
        }

        txn.commit()
            .await
            .map_err(|e| SurveyError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "问卷 {} 评分完成: {} 份作答, {} 道题",
            survey_id, summary.graded_responses, summary.graded_answers
        );

        Ok(Some(summary))
    }
}

// 一次写入的结果
struct AppliedAnswers {
    response: StudentResponseModel,
    questions: Vec<QuestionDetail>,
    contents: HashMap<i64, AnswerContent>,
}

/// 在事务内写入一组答案
///
/// 检查问卷对学生可见且仍在作答期，找到或创建作答记录，
/// 然后为每道可作答的题目写入一行答案。
async fn apply_answers(
    txn: &DatabaseTransaction,
    student_id: i64,
    survey_id: i64,
    fields: &AnswerFields,
    now: DateTime<Utc>,
) -> Result<AppliedAnswers> {
    let model = find_visible_survey(txn, student_id, survey_id)
        .await?
        .ok_or_else(|| SurveyError::not_found("问卷不存在"))?;
    let survey = to_survey(txn, model).await?;
    lifecycle::ensure_accepting_answers(&survey, now)?;

    let response = match find_response(txn, survey_id, student_id).await? {
        Some(existing) => existing,
        None => insert_response(txn, survey_id, student_id, now).await?,
    };
    if response.is_submitted {
        return Err(SurveyError::already_submitted("问卷已提交，不能再修改答案"));
    }

    let questions = load_question_details(txn, survey_id).await?;
    let mut existing: HashMap<i64, QuestionAnswerModel> = QuestionAnswers::find()
        .filter(question_answers::Column::ResponseId.eq(response.id))
        .all(txn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("查询答案失败: {e}")))?
        .into_iter()
        .map(|m| (m.question_id, m))
        .collect();

    let mut contents = HashMap::new();
    for question in &questions {
        let Some(content) = route_answer(question, fields.get(question.id())) else {
            continue;
        };

        // 三列同时写入，非当前题型的列总是被清空
        let mut model = match existing.remove(&question.id()) {
            Some(row) => row.into(),
            None => QuestionAnswerActiveModel {
                response_id: Set(response.id),
                question_id: Set(question.id()),
                ..Default::default()
            },
        };
        model.selected_option_id = Set(content.selected_option_id());
        model.true_false_answer = Set(content.true_false_answer());
        model.text_answer = Set(content.text_answer());
        model.is_correct = Set(None);
        model.points_earned = Set(None);
        model
            .save(txn)
            .await
            .map_err(|e| SurveyError::database_operation(format!("保存答案失败: {e}")))?;

        contents.insert(question.id(), content);
    }

    Ok(AppliedAnswers {
        response,
        questions,
        contents,
    })
}

async fn find_response<C: ConnectionTrait>(
    conn: &C,
    survey_id: i64,
    student_id: i64,
) -> Result<Option<StudentResponseModel>> {
    StudentResponses::find()
        .filter(student_responses::Column::SurveyId.eq(survey_id))
        .filter(student_responses::Column::StudentId.eq(student_id))
        .one(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("查询作答失败: {e}")))
}

/// 插入作答记录，唯一索引冲突映射为 Conflict
async fn insert_response<C: ConnectionTrait>(
    conn: &C,
    survey_id: i64,
    student_id: i64,
    now: DateTime<Utc>,
) -> Result<StudentResponseModel> {
    StudentResponseActiveModel {
        survey_id: Set(survey_id),
        student_id: Set(student_id),
        is_submitted: Set(false),
        started_at: Set(now.timestamp()),
        submitted_at: Set(None),
        score: Set(None),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| match SurveyError::from(e) {
        SurveyError::Conflict(_) => SurveyError::conflict("该学生已存在这份问卷的作答"),
        other => other,
    })
}

async fn load_response_detail<C: ConnectionTrait>(
    conn: &C,
    response: StudentResponseModel,
) -> Result<ResponseDetail> {
    let answers = QuestionAnswers::find()
        .filter(question_answers::Column::ResponseId.eq(response.id))
        .order_by_asc(question_answers::Column::QuestionId)
        .all(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("查询答案失败: {e}")))?;

    Ok(ResponseDetail {
        response: response.into_student_response(),
        answers: answers
            .into_iter()
            .map(|m| m.into_question_answer())
            .collect(),
    })
}
