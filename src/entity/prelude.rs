//! 预导入模块，方便使用

pub use super::choice_options::{
    ActiveModel as ChoiceOptionActiveModel, Entity as ChoiceOptions, Model as ChoiceOptionModel,
};
pub use super::enumeration_answers::{
    ActiveModel as EnumerationAnswerActiveModel, Entity as EnumerationAnswers,
    Model as EnumerationAnswerModel,
};
pub use super::question_answers::{
    ActiveModel as QuestionAnswerActiveModel, Entity as QuestionAnswers,
    Model as QuestionAnswerModel,
};
pub use super::question_contexts::{
    ActiveModel as QuestionContextActiveModel, Entity as QuestionContexts,
    Model as QuestionContextModel,
};
pub use super::questions::{
    ActiveModel as QuestionActiveModel, Entity as Questions, Model as QuestionModel,
};
pub use super::section_students::{
    ActiveModel as SectionStudentActiveModel, Entity as SectionStudents,
    Model as SectionStudentModel,
};
pub use super::sections::{ActiveModel as SectionActiveModel, Entity as Sections, Model as SectionModel};
pub use super::student_responses::{
    ActiveModel as StudentResponseActiveModel, Entity as StudentResponses,
    Model as StudentResponseModel,
};
pub use super::survey_sections::{
    ActiveModel as SurveySectionActiveModel, Entity as SurveySections,
    Model as SurveySectionModel,
};
pub use super::surveys::{ActiveModel as SurveyActiveModel, Entity as Surveys, Model as SurveyModel};
pub use super::true_false_answers::{
    ActiveModel as TrueFalseAnswerActiveModel, Entity as TrueFalseAnswers,
    Model as TrueFalseAnswerModel,
};
