//! 问卷统计存储操作

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect};

use super::SeaOrmStorage;
use super::surveys::{find_owned_survey, load_question_details};
use crate::engine::analytics::aggregate;
use crate::entity::prelude::*;
use crate::entity::{question_answers, student_responses};
use crate::errors::{Result, SurveyError};
use crate::models::analytics::responses::SurveyAnalytics;
use crate::models::student_responses::entities::QuestionAnswer;

impl SeaOrmStorage {
    /// 按题目汇总已提交的答案，每次都从数据库重新计算
    pub async fn survey_analytics_impl(
        &self,
        teacher_id: i64,
        survey_id: i64,
    ) -> Result<Option<SurveyAnalytics>> {
        if find_owned_survey(&self.db, teacher_id, survey_id)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        let questions = load_question_details(&self.db, survey_id).await?;
        let (submitted_count, answers) = self.list_submitted_answers(survey_id).await?;

        Ok(Some(SurveyAnalytics {
            survey_id,
            submitted_count,
            questions: aggregate(&questions, &answers),
        }))
    }

    /// 已提交作答的数量及其全部答案
    async fn list_submitted_answers(&self, survey_id: i64) -> Result<(i64, Vec<QuestionAnswer>)> {
        let response_ids: Vec<i64> = StudentResponses::find()
            .select_only()
            .column(student_responses::Column::Id)
            .filter(student_responses::Column::SurveyId.eq(survey_id))
            .filter(student_responses::Column::IsSubmitted.eq(true))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| SurveyError::database_operation(format!("查询已提交作答失败: {e}")))?;

        if response_ids.is_empty() {
            return Ok((0, vec![]));
        }

        let submitted_count = response_ids.len() as i64;
        let answers = QuestionAnswers::find()
            .filter(question_answers::Column::ResponseId.is_in(response_ids))
            .all(&self.db)
            .await
            .map_err(|e| SurveyError::database_operation(format!("查询答案失败: {e}")))?;

        Ok((
            submitted_count,
            answers
                .into_iter()
                .map(|m| m.into_question_answer())
                .collect(),
        ))
    }
}
