//! 班级实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub name: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::section_students::Entity")]
    Students,
    #[sea_orm(has_many = "super::survey_sections::Entity")]
    SurveySections,
}

impl Related<super::section_students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl Related<super::survey_sections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SurveySections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_section(self) -> crate::models::sections::entities::Section {
        use crate::models::sections::entities::Section;
        use chrono::{DateTime, Utc};

        Section {
            id: self.id,
            teacher_id: self.teacher_id,
            name: self.name,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
