//! 班级名单存储操作

use super::SeaOrmStorage;
use crate::entity::section_students::{
    ActiveModel as SectionStudentActiveModel, Column as SectionStudentColumn,
    Entity as SectionStudents,
};
use crate::entity::sections::{ActiveModel, Column, Entity as Sections};
use crate::errors::{Result, SurveyError};
use crate::models::sections::entities::Section;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_section_impl(&self, teacher_id: i64, name: &str) -> Result<Section> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SurveyError::validation("班级名称不能为空"));
        }

        let model = ActiveModel {
            teacher_id: Set(teacher_id),
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SurveyError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_section())
    }

    /// 学生加入教师名下的班级，重复加入返回 Conflict
    pub async fn enroll_student_impl(
        &self,
        teacher_id: i64,
        section_id: i64,
        student_id: i64,
    ) -> Result<()> {
        // 其他教师的班级与不存在的班级同样返回 NotFound
        Sections::find_by_id(section_id)
            .filter(Column::TeacherId.eq(teacher_id))
            .one(&self.db)
            .await
            .map_err(|e| SurveyError::database_operation(format!("查询班级失败: {e}")))?
            .ok_or_else(|| SurveyError::not_found("班级不存在"))?;

        let model = SectionStudentActiveModel {
            section_id: Set(section_id),
            student_id: Set(student_id),
            joined_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model.insert(&self.db).await.map_err(|e| match SurveyError::from(e) {
            SurveyError::Conflict(_) => SurveyError::conflict("学生已在该班级中"),
            other => other,
        })?;

        Ok(())
    }

    /// 列出教师的班级
    pub async fn list_teacher_sections_impl(&self, teacher_id: i64) -> Result<Vec<Section>> {
        let sections = Sections::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SurveyError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(sections.into_iter().map(|m| m.into_section()).collect())
    }
}

/// 学生所在的全部班级 ID
pub(super) async fn student_section_ids<C: ConnectionTrait>(
    conn: &C,
    student_id: i64,
) -> Result<Vec<i64>> {
    SectionStudents::find()
        .select_only()
        .column(SectionStudentColumn::SectionId)
        .filter(SectionStudentColumn::StudentId.eq(student_id))
        .into_tuple::<i64>()
        .all(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("查询学生班级失败: {e}")))
}

/// 确认班级全部属于该教师
pub(super) async fn ensure_sections_owned<C: ConnectionTrait>(
    conn: &C,
    teacher_id: i64,
    section_ids: &[i64],
) -> Result<()> {
    if section_ids.is_empty() {
        return Ok(());
    }

    let owned: Vec<i64> = Sections::find()
        .select_only()
        .column(Column::Id)
        .filter(Column::TeacherId.eq(teacher_id))
        .filter(Column::Id.is_in(section_ids.to_vec()))
        .into_tuple::<i64>()
        .all(conn)
        .await
        .map_err(|e| SurveyError::database_operation(format!("查询班级失败: {e}")))?;

    let missing: Vec<String> = section_ids
        .iter()
        .filter(|id| !owned.contains(id))
        .map(|id| id.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SurveyError::validation(format!(
            "班级不存在: {}",
            missing.join(", ")
        )))
    }
}
