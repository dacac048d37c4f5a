//! 单题答案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "question_answers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub response_id: i64,
    pub question_id: i64,
    pub selected_option_id: Option<i64>,
    pub true_false_answer: Option<bool>,
    #[sea_orm(column_type = "Text", nullable)]
    pub text_answer: Option<String>,
    pub is_correct: Option<bool>,
    pub points_earned: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student_responses::Entity",
        from = "Column::ResponseId",
        to = "super::student_responses::Column::Id"
    )]
    Response,
    #[sea_orm(
        belongs_to = "super::questions::Entity",
        from = "Column::QuestionId",
        to = "super::questions::Column::Id"
    )]
    Question,
}

impl Related<super::student_responses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Response.def()
    }
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question_answer(self) -> crate::models::student_responses::entities::QuestionAnswer {
        crate::models::student_responses::entities::QuestionAnswer {
            id: self.id,
            response_id: self.response_id,
            question_id: self.question_id,
            selected_option_id: self.selected_option_id,
            true_false_answer: self.true_false_answer,
            text_answer: self.text_answer,
            is_correct: self.is_correct,
            points_earned: self.points_earned,
        }
    }
}
