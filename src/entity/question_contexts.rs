//! 题目上下文（代码片段、图片）实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "question_contexts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub question_id: i64,
    pub kind: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub language: Option<String>,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::questions::Entity",
        from = "Column::QuestionId",
        to = "super::questions::Column::Id"
    )]
    Question,
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question_context(self) -> crate::models::surveys::entities::QuestionContext {
        use crate::models::surveys::entities::{ContextKind, QuestionContext};

        QuestionContext {
            id: self.id,
            question_id: self.question_id,
            kind: self.kind.parse::<ContextKind>().unwrap_or(ContextKind::Code),
            content: self.content,
            language: self.language,
            position: self.position,
        }
    }
}
