//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod choice_options;
pub mod enumeration_answers;
pub mod question_answers;
pub mod question_contexts;
pub mod questions;
pub mod section_students;
pub mod sections;
pub mod student_responses;
pub mod survey_sections;
pub mod surveys;
pub mod true_false_answers;
