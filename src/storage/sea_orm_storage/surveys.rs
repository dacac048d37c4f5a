//! 问卷存储操作

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use tracing::{info, warn};

use super::SeaOrmStorage;
use super::sections::{ensure_sections_owned, student_section_ids};
use crate::engine::builder::{
    SurveyDraft, SurveyPlan, assemble_student_views, assemble_views,
};
use crate::engine::lifecycle;
use crate::entity::prelude::*;
use crate::entity::{
    choice_options, enumeration_answers, question_answers, question_contexts, questions,
    student_responses, survey_sections, surveys, true_false_answers,
};
use crate::errors::{Result, SurveyError};
use crate::models::{
    PaginationInfo,
    surveys::{
        entities::{QuestionDetail, Survey, SurveyStatus},
        requests::SurveyListQuery,
        responses::{StudentSurveyDocument, SurveyDocument, SurveyListResponse},
    },
};
use crate::utils::escape_like_pattern;

impl SeaOrmStorage {
    /// 创建问卷
    pub async fn create_survey_impl(
        &self,
        teacher_id: i64,
        draft: SurveyDraft,
        now: DateTime<Utc>,
    ) -> Result<SurveyDocument> {
        // 新问卷从草稿开始，只允许直接发布
        let status = match draft.status {
            Some(target) => lifecycle::transition(SurveyStatus::Draft, target)?,
            None => SurveyStatus::Draft,
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SurveyError::database_operation(format!("开启事务失败: {e}")))?;

        ensure_sections_owned(&txn, teacher_id, &draft.section_ids).await?;

        let model = SurveyActiveModel {
            teacher_id: Set(teacher_id),
            title: Set(draft.title),
            description: Set(draft.description),
            status: Set(status.to_string()),
            total_points: Set(draft.plan.as_ref().map_or(0.0, |p| p.total_points)),
            time_limit: Set(draft.time_limit),
            due_date: Set(draft.due_date.map(|d| d.timestamp())),
            start_date: Set(draft.start_date.map(|d| d.timestamp())),
            end_date: Set(draft.end_date.map(|d| d.timestamp())),
            created_at: Set(now.timestamp()),
            updated_at: Set(now.timestamp()),
            ..Default::default()
        };

        let survey = model
            .insert(&txn)
            .await
            .map_err(|e| SurveyError::database_operation(format!("创建问卷失败: {e}")))?;

        replace_survey_sections(&txn, survey.id, &draft.section_ids).await?;
        if let Some(plan) = &draft.plan {
            insert_questions(&txn, survey.id, plan).await?;
        }

        txn.commit()
            .await
            .map_err(|e| SurveyError::database_operation(format!("提交事务失败: {e}")))?;

        info!("教师 {} 创建问卷 {}", teacher_id, survey.id);

        self.get_survey_document_impl(teacher_id, survey.id)
            .await?
            .ok_or_else(|| SurveyError::not_found("问卷不存在"))
    }

    /// 整体保存问卷
    ///
    /// 带题目列表时先删除旧题目再重建，已有的作答会随题目一起删除。
    pub async fn save_survey_impl(
        &self,
        teacher_id: i64,
        survey_id: i64,
        draft: SurveyDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<SurveyDocument>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SurveyError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = find_owned_survey(&txn, teacher_id, survey_id).await? else {
            return Ok(None);
        };

        let current = parse_status(&existing.status);
        if current == SurveyStatus::Closed {
            return Err(SurveyError::invalid_transition("问卷已关闭，无法再编辑"));
        }
        let status = match draft.status {
            Some(target) => lifecycle::transition(current, target)?,
            None => current,
        };

        ensure_sections_owned(&txn, teacher_id, &draft.section_ids).await?;

        let mut model: SurveyActiveModel = existing.into();
        model.title = Set(draft.title);
        model.description = Set(draft.description);
        model.status = Set(status.to_string());
        model.time_limit = Set(draft.time_limit);
        model.due_date = Set(draft.due_date.map(|d| d.timestamp()));
        model.start_date = Set(draft.start_date.map(|d| d.timestamp()));
        model.end_date = Set(draft.end_date.map(|d| d.timestamp()));
        model.updated_at = Set(now.timestamp());

        if let Some(plan) = &draft.plan {
            let response_count = StudentResponses::find()
                .filter(student_responses::Column::SurveyId.eq(survey_id))
                .count(&txn)
                .await
                .map_err(|e| SurveyError::database_operation(format!("查询作答数量失败: {e}")))?;
            if response_count > 0 {
                warn!(
                    "问卷 {} 已有 {} 份作答，替换题目将删除这些答案",
                    survey_id, response_count
                );
            }

            delete_questions(&txn, survey_id).await?;
            insert_questions(&txn, survey_id, plan).await?;
            model.total_points = Set(plan.total_points);
        }

        model
            .update(&txn)
            .await
            .map_err(|e| SurveyError::database_operation(format!("更新问卷失败: {e}")))?;
        replace_survey_sections(&txn, survey_id, &draft.section_ids).await?;

        txn.commit()
            .await
            .map_err(|e| SurveyError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_survey_document_impl(teacher_id, survey_id).await
    }

    /// 获取教师自己的问卷文档
    pub async fn get_survey_document_impl(
        &self,
        teacher_id: i64,
        survey_id: i64,
    ) -> Result<Option<SurveyDocument>> {
        let Some(model) = find_owned_survey(&self.db, teacher_id, survey_id).await? else {
            return Ok(None);
        };

        let details = load_question_details(&self.db, survey_id).await?;
        let survey = to_survey(&self.db, model).await?;

        Ok(Some(SurveyDocument {
            survey,
            questions: assemble_views(&details),
        }))
    }

    /// 获取学生可见的问卷
    pub async fn get_student_survey_impl(
        &self,
        student_id: i64,
        survey_id: i64,
    ) -> Result<Option<StudentSurveyDocument>> {
        let Some(model) = find_visible_survey(&self.db, student_id, survey_id).await? else {
            return Ok(None);
        };

        let details = load_question_details(&self.db, survey_id).await?;
        let survey = to_survey(&self.db, model).await?;

        Ok(Some(StudentSurveyDocument {
            survey,
            questions: assemble_student_views(&details),
        }))
    }

    /// 分页列出教师的问卷
    pub async fn list_teacher_surveys_impl(
        &self,
        teacher_id: i64,
        query: SurveyListQuery,
    ) -> Result<SurveyListResponse> {
        let select = Surveys::find().filter(surveys::Column::TeacherId.eq(teacher_id));
        self.paginate_surveys(select, query).await
    }

    /// 分页列出分配给学生的问卷（不含草稿）
    pub async fn list_student_surveys_impl(
        &self,
        student_id: i64,
        query: SurveyListQuery,
    ) -> Result<SurveyListResponse> {
        let section_ids = student_section_ids(&self.db, student_id).await?;

        let survey_ids: Vec<i64> = if section_ids.is_empty() {
            vec![]
        } else {
            SurveySections::find()
                .select_only()
                .column(survey_sections::Column::SurveyId)
                .filter(survey_sections::Column::SectionId.is_in(section_ids))
                .distinct()
                .into_tuple::<i64>()
                .all(&self.db)
                .await
                .map_err(|e| {
                    SurveyError::database_operation(format!("查询问卷分配失败: {e}"))
                })?
        };

        let select = Surveys::find()
            .filter(surveys::Column::Id.is_in(survey_ids))
            .filter(surveys::Column::Status.ne(SurveyStatus::DRAFT));
        self.paginate_surveys(select, query).await
    }

    async fn paginate_surveys(
        &self,
        mut select: Select<Surveys>,
        query: SurveyListQuery,
    ) -> Result<SurveyListResponse> {
        let (page, size) = query.pagination.normalized();

        // 状态筛选
        if let Some(status) = query.status {
            select = select.filter(surveys::Column::Status.eq(status.as_str()));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(surveys::Column::Title.contains(&escaped));
        }

        select = select.order_by_desc(surveys::Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SurveyError::database_operation(format!("查询问卷总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SurveyError::database_operation(format!("查询问卷页数失败: {e}")))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SurveyError::database_operation(format!("查询问卷列表失败: {e}")))?;

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let mut sections = survey_section_ids(&self.db, &ids).await?;

        Ok(SurveyListResponse {
            items: models
                .into_iter()
                .map(|m| {
                    let section_ids = sections.remove(&m.id).unwrap_or_default();
                    m.into_survey(section_ids)
                })
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 删除问卷及其题目、作答
    pub async fn delete_survey_impl(&self, teacher_id: i64, survey_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SurveyError::database_operation(format!("开启事务失败: {e}")))?;

        if find_owned_survey(&txn, teacher_id, survey_id)
            .await?
            .is_none()
        {
            return Ok(false);
        }

        delete_questions(&txn, survey_id).await?;
        StudentResponses::delete_many()
            .filter(student_responses::Column::SurveyId.eq(survey_id))
            .exec(&txn)
            .await
            .map_err(|e| SurveyError::database_operation(format!("删除作答失败: {e}")))?;
        replace_survey_sections(&txn, survey_id, &[]).await?;

        let result = Surveys::delete_by_id(survey_id)
            .exec(&txn)
            .await
            .map_err(|e| SurveyError::database_operation(format!("删除问卷失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SurveyError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 变更问卷状态
    pub async fn set_survey_status_impl(
        &self,
        teacher_id: i64,
        survey_id: i64,
        target: SurveyStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Survey>> {
        let Some(existing) = find_owned_survey(&self.db, teacher_id, survey_id).await? else {
            return Ok(None);
        };

        let current = parse_status(&existing.status);
        let next = lifecycle::transition(current, target)?;

        let model = if next == current {
            existing
        } else {
            let mut active: SurveyActiveModel = existing.into();
            active.status = Set(next.to_string());
            active.updated_at = Set(now.timestamp());
            let updated = active
                .update(&self.db)
                .await
                .map_err(|e| SurveyError::database_operation(format!("更新问卷状态失败: {e}")))?;
            info!("问卷 {} 状态变更: {} -> {}", survey_id, current, next);
            updated
        };

        Ok(Some(to_survey(&self.db, model).await?))
    }

    /// 关闭所有已过截止时间的已发布问卷
    ///
    /// 单条 UPDATE 语句，重复执行不会产生额外影响。
    pub async fn sweep_overdue_impl(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = Surveys::update_many()
            .col_expr(
                surveys::Column::Status,
                Expr::value(SurveyStatus::CLOSED.to_string()),
            )
            .col_expr(surveys::Column::UpdatedAt, Expr::value(now.timestamp()))
            .filter(surveys::Column::Status.eq(SurveyStatus::PUBLISHED))
            .filter(surveys::Column::DueDate.is_not_null())
            .filter(surveys::Column::DueDate.lte(now.timestamp()))
            .exec(&self.db)
            .await
            .map_err(|e| SurveyError::database_operation(format!("关闭过期问卷失败: {e}")))?;

        if result.rows_affected > 0 {
            info!("已自动关闭 {} 份过期问卷", result.rows_affected);
        }

        Ok(result.rows_affected)
    }
}

pub(super) fn parse_status(raw: &str) -> SurveyStatus {
    raw.parse::<SurveyStatus>().unwrap_or(SurveyStatus::Draft)
}

/// 按教师归属查找问卷
pub(super) async fn find_owned_survey<C: ConnectionTrait>(
    conn: &C,
    teacher_id: i64,
    survey_id: i64,
) -> Result<Option<SurveyModel>> {
    Surveys::find_by_id(survey_id)
        .filter(surveys::Column::TeacherId.eq(teacher_id))
        .one(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("查询问卷失败: {e}")))
}

/// 按学生班级查找问卷：非草稿且分配给学生所在的班级
pub(super) async fn find_visible_survey<C: ConnectionTrait>(
    conn: &C,
    student_id: i64,
    survey_id: i64,
) -> Result<Option<SurveyModel>> {
    let Some(model) = Surveys::find_by_id(survey_id)
        .filter(surveys::Column::Status.ne(SurveyStatus::DRAFT))
        .one(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("查询问卷失败: {e}")))?
    else {
        return Ok(None);
    };

    let section_ids = student_section_ids(conn, student_id).await?;
    if section_ids.is_empty() {
        return Ok(None);
    }

    let assigned = SurveySections::find()
        .filter(survey_sections::Column::SurveyId.eq(survey_id))
        .filter(survey_sections::Column::SectionId.is_in(section_ids))
        .count(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("查询问卷分配失败: {e}")))?;

    Ok((assigned > 0).then_some(model))
}

pub(super) async fn to_survey<C: ConnectionTrait>(conn: &C, model: SurveyModel) -> Result<Survey> {
    let mut sections = survey_section_ids(conn, &[model.id]).await?;
    let section_ids = sections.remove(&model.id).unwrap_or_default();
    Ok(model.into_survey(section_ids))
}

async fn survey_section_ids<C: ConnectionTrait>(
    conn: &C,
    survey_ids: &[i64],
) -> Result<HashMap<i64, Vec<i64>>> {
    if survey_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = SurveySections::find()
        .filter(survey_sections::Column::SurveyId.is_in(survey_ids.to_vec()))
        .order_by_asc(survey_sections::Column::SectionId)
        .all(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("查询问卷分配失败: {e}")))?;

    let mut grouped: HashMap<i64, Vec<i64>> = HashMap::new();
    for row in rows {
        grouped.entry(row.survey_id).or_default().push(row.section_id);
    }
    Ok(grouped)
}

async fn replace_survey_sections<C: ConnectionTrait>(
    conn: &C,
    survey_id: i64,
    section_ids: &[i64],
) -> Result<()> {
    SurveySections::delete_many()
        .filter(survey_sections::Column::SurveyId.eq(survey_id))
        .exec(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("删除问卷分配失败: {e}")))?;

    if section_ids.is_empty() {
        return Ok(());
    }

    let models = section_ids.iter().map(|section_id| SurveySectionActiveModel {
        survey_id: Set(survey_id),
        section_id: Set(*section_id),
        ..Default::default()
    });
    SurveySections::insert_many(models)
        .exec(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("保存问卷分配失败: {e}")))?;

    Ok(())
}

/// 读取问卷的全部题目及答案键，按位置排序
pub(super) async fn load_question_details<C: ConnectionTrait>(
    conn: &C,
    survey_id: i64,
) -> Result<Vec<QuestionDetail>> {
    let question_models = Questions::find()
        .filter(questions::Column::SurveyId.eq(survey_id))
        .order_by_asc(questions::Column::Position)
        .order_by_asc(questions::Column::Id)
        .all(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("查询题目失败: {e}")))?;

    if question_models.is_empty() {
        return Ok(vec![]);
    }
    let ids: Vec<i64> = question_models.iter().map(|q| q.id).collect();

    let mut options: HashMap<i64, Vec<_>> = HashMap::new();
    for option in ChoiceOptions::find()
        .filter(choice_options::Column::QuestionId.is_in(ids.clone()))
        .order_by_asc(choice_options::Column::Position)
        .order_by_asc(choice_options::Column::Id)
        .all(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("查询选项失败: {e}")))?
    {
        options
            .entry(option.question_id)
            .or_default()
            .push(option.into_choice_option());
    }

    let mut contexts: HashMap<i64, Vec<_>> = HashMap::new();
    for context in QuestionContexts::find()
        .filter(question_contexts::Column::QuestionId.is_in(ids.clone()))
        .order_by_asc(question_contexts::Column::Position)
        .all(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("查询题目上下文失败: {e}")))?
    {
        contexts
            .entry(context.question_id)
            .or_default()
            .push(context.into_question_context());
    }

    let true_false: HashMap<i64, bool> = TrueFalseAnswers::find()
        .filter(true_false_answers::Column::QuestionId.is_in(ids.clone()))
        .all(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("查询判断题答案失败: {e}")))?
        .into_iter()
        .map(|m| (m.question_id, m.correct_answer))
        .collect();

    let mut enumeration: HashMap<i64, Vec<String>> = HashMap::new();
    for answer in EnumerationAnswers::find()
        .filter(enumeration_answers::Column::QuestionId.is_in(ids))
        .order_by_asc(enumeration_answers::Column::Position)
        .all(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("查询枚举题答案失败: {e}")))?
    {
        enumeration
            .entry(answer.question_id)
            .or_default()
            .push(answer.answer_text);
    }

    Ok(question_models
        .into_iter()
        .map(|model| {
            let id = model.id;
            QuestionDetail {
                question: model.into_question(),
                options: options.remove(&id).unwrap_or_default(),
                correct_answer: true_false.get(&id).copied(),
                enumeration_answers: enumeration.remove(&id).unwrap_or_default(),
                contexts: contexts.remove(&id).unwrap_or_default(),
            }
        })
        .collect())
}

async fn insert_questions<C: ConnectionTrait>(
    conn: &C,
    survey_id: i64,
    plan: &SurveyPlan,
) -> Result<()> {
    for planned in &plan.questions {
        let question = QuestionActiveModel {
            survey_id: Set(survey_id),
            question_type: Set(planned.question_type.to_string()),
            question_text: Set(planned.text.clone()),
            position: Set(planned.position),
            required: Set(planned.required),
            points: Set(planned.points),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("创建题目失败: {e}")))?;

        if !planned.options.is_empty() {
            let models = planned
                .options
                .iter()
                .enumerate()
                .map(|(i, option)| ChoiceOptionActiveModel {
                    question_id: Set(question.id),
                    option_text: Set(option.text.clone()),
                    is_correct: Set(option.is_correct),
                    position: Set(i as i32),
                    ..Default::default()
                });
            ChoiceOptions::insert_many(models)
                .exec(conn)
                .await
                .map_err(|e| SurveyError::database_operation(format!("创建选项失败: {e}")))?;
        }

        if let Some(correct_answer) = planned.correct_answer {
            TrueFalseAnswerActiveModel {
                question_id: Set(question.id),
                correct_answer: Set(correct_answer),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(|e| SurveyError::database_operation(format!("创建判断题答案失败: {e}")))?;
        }

        if !planned.answers.is_empty() {
            let models = planned
                .answers
                .iter()
                .enumerate()
                .map(|(i, text)| EnumerationAnswerActiveModel {
                    question_id: Set(question.id),
                    answer_text: Set(text.clone()),
                    position: Set(i as i32),
                    ..Default::default()
                });
            EnumerationAnswers::insert_many(models)
                .exec(conn)
                .await
                .map_err(|e| SurveyError::database_operation(format!("创建枚举题答案失败: {e}")))?;
        }

        if !planned.contexts.is_empty() {
            let models = planned
                .contexts
                .iter()
                .enumerate()
                .map(|(i, context)| QuestionContextActiveModel {
                    question_id: Set(question.id),
                    kind: Set(context.kind.to_string()),
                    content: Set(context.content.clone()),
                    language: Set(context.language.clone()),
                    position: Set(i as i32),
                    ..Default::default()
                });
            QuestionContexts::insert_many(models)
                .exec(conn)
                .await
                .map_err(|e| SurveyError::database_operation(format!("创建题目上下文失败: {e}")))?;
        }
    }

    Ok(())
}

/// 删除问卷的全部题目、答案键及学生对这些题目的答案
async fn delete_questions<C: ConnectionTrait>(conn: &C, survey_id: i64) -> Result<()> {
    let ids: Vec<i64> = Questions::find()
        .select_only()
        .column(questions::Column::Id)
        .filter(questions::Column::SurveyId.eq(survey_id))
        .into_tuple::<i64>()
        .all(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("查询题目失败: {e}")))?;

    if ids.is_empty() {
        return Ok(());
    }

    QuestionAnswers::delete_many()
        .filter(question_answers::Column::QuestionId.is_in(ids.clone()))
        .exec(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("删除答案失败: {e}")))?;
    ChoiceOptions::delete_many()
        .filter(choice_options::Column::QuestionId.is_in(ids.clone()))
        .exec(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("删除选项失败: {e}")))?;
    TrueFalseAnswers::delete_many()
        .filter(true_false_answers::Column::QuestionId.is_in(ids.clone()))
        .exec(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("删除判断题答案失败: {e}")))?;
    EnumerationAnswers::delete_many()
        .filter(enumeration_answers::Column::QuestionId.is_in(ids.clone()))
        .exec(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("删除枚举题答案失败: {e}")))?;
    QuestionContexts::delete_many()
        .filter(question_contexts::Column::QuestionId.is_in(ids))
        .exec(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("删除题目上下文失败: {e}")))?;

    Questions::delete_many()
        .filter(questions::Column::SurveyId.eq(survey_id))
        .exec(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("删除题目失败: {e}")))?;

    Ok(())
}
