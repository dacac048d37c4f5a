//! 问卷实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "surveys")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub status: String,
    pub total_points: f64,
    pub time_limit: Option<i32>,
    pub due_date: Option<i64>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::questions::Entity")]
    Questions,
    #[sea_orm(has_many = "super::survey_sections::Entity")]
    SurveySections,
    #[sea_orm(has_many = "super::student_responses::Entity")]
    Responses,
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl Related<super::survey_sections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SurveySections.def()
    }
}

impl Related<super::student_responses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Responses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    /// `section_ids` 来自 survey_sections，需要由调用方单独查询
    pub fn into_survey(self, section_ids: Vec<i64>) -> crate::models::surveys::entities::Survey {
        use crate::models::surveys::entities::{Survey, SurveyStatus};
        use chrono::{DateTime, Utc};

        let to_datetime = |ts: i64| DateTime::<Utc>::from_timestamp(ts, 0);

        Survey {
            id: self.id,
            teacher_id: self.teacher_id,
            title: self.title,
            description: self.description,
            status: self
                .status
                .parse::<SurveyStatus>()
                .unwrap_or(SurveyStatus::Draft),
            total_points: self.total_points,
            time_limit: self.time_limit,
            due_date: self.due_date.and_then(to_datetime),
            start_date: self.start_date.and_then(to_datetime),
            end_date: self.end_date.and_then(to_datetime),
            section_ids,
            created_at: to_datetime(self.created_at).unwrap_or_default(),
            updated_at: to_datetime(self.updated_at).unwrap_or_default(),
        }
    }
}
