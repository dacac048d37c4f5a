//! 学生作答实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_responses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub survey_id: i64,
    pub student_id: i64,
    pub is_submitted: bool,
    pub started_at: i64,
    pub submitted_at: Option<i64>,
    pub score: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::surveys::Entity",
        from = "Column::SurveyId",
        to = "super::surveys::Column::Id"
    )]
    Survey,
    #[sea_orm(has_many = "super::question_answers::Entity")]
    Answers,
}

impl Related<super::surveys::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Survey.def()
    }
}

impl Related<super::question_answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_student_response(self) -> crate::models::student_responses::entities::StudentResponse {
        use crate::models::student_responses::entities::StudentResponse;
        use chrono::{DateTime, Utc};

        StudentResponse {
            id: self.id,
            survey_id: self.survey_id,
            student_id: self.student_id,
            is_submitted: self.is_submitted,
            started_at: DateTime::<Utc>::from_timestamp(self.started_at, 0).unwrap_or_default(),
            submitted_at: self
                .submitted_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            score: self.score,
        }
    }
}
