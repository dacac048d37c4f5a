//! 题目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub survey_id: i64,
    pub question_type: String,
    #[sea_orm(column_type = "Text")]
    pub question_text: String,
    pub position: f64,
    pub required: bool,
    pub points: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::surveys::Entity",
        from = "Column::SurveyId",
        to = "super::surveys::Column::Id"
    )]
    Survey,
    #[sea_orm(has_many = "super::choice_options::Entity")]
    Options,
    #[sea_orm(has_many = "super::question_contexts::Entity")]
    Contexts,
    #[sea_orm(has_many = "super::enumeration_answers::Entity")]
    EnumerationAnswers,
    #[sea_orm(has_one = "super::true_false_answers::Entity")]
    TrueFalseAnswer,
}

impl Related<super::surveys::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Survey.def()
    }
}

impl Related<super::choice_options::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

impl Related<super::question_contexts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contexts.def()
    }
}

impl Related<super::enumeration_answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnumerationAnswers.def()
    }
}

impl Related<super::true_false_answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrueFalseAnswer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_question(self) -> crate::models::surveys::entities::Question {
        use crate::models::surveys::entities::{Question, QuestionType};

        Question {
            id: self.id,
            survey_id: self.survey_id,
            // 未知题型按段落处理，不参与作答
            question_type: self
                .question_type
                .parse::<QuestionType>()
                .unwrap_or(QuestionType::Paragraph),
            question_text: self.question_text,
            position: self.position,
            required: self.required,
            points: self.points,
        }
    }
}
