use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::engine::answers::AnswerFields;
use crate::engine::builder::SurveyDraft;
use crate::models::{
    analytics::responses::SurveyAnalytics,
    sections::entities::Section,
    student_responses::responses::{GradingSummary, ResponseDetail, ResponseSummary, SubmitOutcome},
    surveys::{
        entities::{Survey, SurveyStatus},
        requests::SurveyListQuery,
        responses::{StudentSurveyDocument, SurveyDocument, SurveyListResponse},
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 班级名单方法
    // 创建班级
    async fn create_section(&self, teacher_id: i64, name: &str) -> Result<Section>;
    // 学生加入教师名下的班级
    async fn enroll_student(&self, teacher_id: i64, section_id: i64, student_id: i64)
    -> Result<()>;
    // 列出教师的班级
    async fn list_teacher_sections(&self, teacher_id: i64) -> Result<Vec<Section>>;

    /// 问卷编写方法（按教师归属限定）
    // 创建问卷
    async fn create_survey(
        &self,
        teacher_id: i64,
        draft: SurveyDraft,
        now: DateTime<Utc>,
    ) -> Result<SurveyDocument>;
    // 整体保存问卷
    async fn save_survey(
        &self,
        teacher_id: i64,
        survey_id: i64,
        draft: SurveyDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<SurveyDocument>>;
    // 获取完整问卷文档（含答案键）
    async fn get_survey_document(
        &self,
        teacher_id: i64,
        survey_id: i64,
    ) -> Result<Option<SurveyDocument>>;
    // 列出教师的问卷
    async fn list_teacher_surveys(
        &self,
        teacher_id: i64,
        query: SurveyListQuery,
    ) -> Result<SurveyListResponse>;
    // 删除问卷
    async fn delete_survey(&self, teacher_id: i64, survey_id: i64) -> Result<bool>;
    // 变更问卷状态
    async fn set_survey_status(
        &self,
        teacher_id: i64,
        survey_id: i64,
        target: SurveyStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Survey>>;
    // 关闭所有已过截止时间的问卷，返回关闭数量
    async fn sweep_overdue(&self, now: DateTime<Utc>) -> Result<u64>;

    /// 学生访问方法（按班级名单限定）
    // 获取学生可见的问卷（不含答案键）
    async fn get_student_survey(
        &self,
        student_id: i64,
        survey_id: i64,
    ) -> Result<Option<StudentSurveyDocument>>;
    // 列出分配给学生的问卷
    async fn list_student_surveys(
        &self,
        student_id: i64,
        query: SurveyListQuery,
    ) -> Result<SurveyListResponse>;

    /// 作答方法（首次保存时创建作答记录，同一学生同一问卷只能有一条）
    // 保存草稿
    async fn save_draft(
        &self,
        student_id: i64,
        survey_id: i64,
        fields: &AnswerFields,
        now: DateTime<Utc>,
    ) -> Result<ResponseDetail>;
    // 正式提交
    async fn submit_response(
        &self,
        student_id: i64,
        survey_id: i64,
        fields: &AnswerFields,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome>;
    // 获取学生自己的作答
    async fn get_my_response(
        &self,
        student_id: i64,
        survey_id: i64,
    ) -> Result<Option<ResponseDetail>>;
    // 列出问卷的全部作答
    async fn list_responses(
        &self,
        teacher_id: i64,
        survey_id: i64,
    ) -> Result<Option<Vec<ResponseSummary>>>;
    // 自动评分
    async fn grade_survey(&self, teacher_id: i64, survey_id: i64)
    -> Result<Option<GradingSummary>>;

    /// 统计方法
    async fn survey_analytics(
        &self,
        teacher_id: i64,
        survey_id: i64,
    ) -> Result<Option<SurveyAnalytics>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
