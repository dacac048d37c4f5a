use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建班级（花名册）表
        manager
            .create_table(
                Table::create()
                    .table(Sections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sections::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sections::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Sections::Name).string().not_null())
                    .col(ColumnDef::new(Sections::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建班级学生关联表
        manager
            .create_table(
                Table::create()
                    .table(SectionStudents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SectionStudents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SectionStudents::SectionId).big_integer().not_null())
                    .col(ColumnDef::new(SectionStudents::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(SectionStudents::JoinedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(SectionStudents::Table, SectionStudents::SectionId)
                            .to(Sections::Table, Sections::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建问卷表
        manager
            .create_table(
                Table::create()
                    .table(Surveys::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Surveys::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Surveys::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Surveys::Title).string().not_null())
                    .col(ColumnDef::new(Surveys::Description).text().null())
                    .col(ColumnDef::new(Surveys::Status).string().not_null())
                    .col(
                        ColumnDef::new(Surveys::TotalPoints)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Surveys::TimeLimit).integer().null())
                    .col(ColumnDef::new(Surveys::DueDate).big_integer().null())
                    .col(ColumnDef::new(Surveys::StartDate).big_integer().null())
                    .col(ColumnDef::new(Surveys::EndDate).big_integer().null())
                    .col(ColumnDef::new(Surveys::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Surveys::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建问卷与班级关联表
        manager
            .create_table(
                Table::create()
                    .table(SurveySections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SurveySections::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SurveySections::SurveyId).big_integer().not_null())
                    .col(ColumnDef::new(SurveySections::SectionId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(SurveySections::Table, SurveySections::SurveyId)
                            .to(Surveys::Table, Surveys::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SurveySections::Table, SurveySections::SectionId)
                            .to(Sections::Table, Sections::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建题目表
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Questions::SurveyId).big_integer().not_null())
                    .col(ColumnDef::new(Questions::QuestionType).string().not_null())
                    .col(ColumnDef::new(Questions::QuestionText).text().not_null())
                    .col(ColumnDef::new(Questions::Position).double().not_null())
                    .col(
                        ColumnDef::new(Questions::Required)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Questions::Points)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Questions::Table, Questions::SurveyId)
                            .to(Surveys::Table, Surveys::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建题目上下文（代码片段/图片）表
        manager
            .create_table(
                Table::create()
                    .table(QuestionContexts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionContexts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuestionContexts::QuestionId).big_integer().not_null())
                    .col(ColumnDef::new(QuestionContexts::Kind).string().not_null())
                    .col(ColumnDef::new(QuestionContexts::Content).text().not_null())
                    .col(ColumnDef::new(QuestionContexts::Language).string().null())
                    .col(ColumnDef::new(QuestionContexts::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuestionContexts::Table, QuestionContexts::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建选项表
        manager
            .create_table(
                Table::create()
                    .table(ChoiceOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChoiceOptions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChoiceOptions::QuestionId).big_integer().not_null())
                    .col(ColumnDef::new(ChoiceOptions::OptionText).text().not_null())
                    .col(
                        ColumnDef::new(ChoiceOptions::IsCorrect)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(ChoiceOptions::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ChoiceOptions::Table, ChoiceOptions::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建判断题答案表
        manager
            .create_table(
                Table::create()
                    .table(TrueFalseAnswers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TrueFalseAnswers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TrueFalseAnswers::QuestionId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TrueFalseAnswers::CorrectAnswer).boolean().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(TrueFalseAnswers::Table, TrueFalseAnswers::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建填空（枚举）题答案表
        manager
            .create_table(
                Table::create()
                    .table(EnumerationAnswers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnumerationAnswers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EnumerationAnswers::QuestionId).big_integer().not_null())
                    .col(ColumnDef::new(EnumerationAnswers::AnswerText).string().not_null())
                    .col(ColumnDef::new(EnumerationAnswers::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(EnumerationAnswers::Table, EnumerationAnswers::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学生作答表
        manager
            .create_table(
                Table::create()
                    .table(StudentResponses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentResponses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudentResponses::SurveyId).big_integer().not_null())
                    .col(ColumnDef::new(StudentResponses::StudentId).big_integer().not_null())
                    .col(
                        ColumnDef::new(StudentResponses::IsSubmitted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(StudentResponses::StartedAt).big_integer().not_null())
                    .col(ColumnDef::new(StudentResponses::SubmittedAt).big_integer().null())
                    .col(ColumnDef::new(StudentResponses::Score).double().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentResponses::Table, StudentResponses::SurveyId)
                            .to(Surveys::Table, Surveys::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建逐题答案表
        manager
            .create_table(
                Table::create()
                    .table(QuestionAnswers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuestionAnswers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QuestionAnswers::ResponseId).big_integer().not_null())
                    .col(ColumnDef::new(QuestionAnswers::QuestionId).big_integer().not_null())
                    .col(ColumnDef::new(QuestionAnswers::SelectedOptionId).big_integer().null())
                    .col(ColumnDef::new(QuestionAnswers::TrueFalseAnswer).boolean().null())
                    .col(ColumnDef::new(QuestionAnswers::TextAnswer).text().null())
                    .col(ColumnDef::new(QuestionAnswers::IsCorrect).boolean().null())
                    .col(ColumnDef::new(QuestionAnswers::PointsEarned).double().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuestionAnswers::Table, QuestionAnswers::ResponseId)
                            .to(StudentResponses::Table, StudentResponses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(QuestionAnswers::Table, QuestionAnswers::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sections_teacher_id")
                    .table(Sections::Table)
                    .col(Sections::TeacherId)
                    .to_owned(),
            )
            .await?;

        // 同一学生在同一班级只能出现一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_section_students_unique")
                    .table(SectionStudents::Table)
                    .col(SectionStudents::SectionId)
                    .col(SectionStudents::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_section_students_student_id")
                    .table(SectionStudents::Table)
                    .col(SectionStudents::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_surveys_teacher_id")
                    .table(Surveys::Table)
                    .col(Surveys::TeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_surveys_status_due_date")
                    .table(Surveys::Table)
                    .col(Surveys::Status)
                    .col(Surveys::DueDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_survey_sections_unique")
                    .table(SurveySections::Table)
                    .col(SurveySections::SurveyId)
                    .col(SurveySections::SectionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_questions_survey_id")
                    .table(Questions::Table)
                    .col(Questions::SurveyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_choice_options_question_id")
                    .table(ChoiceOptions::Table)
                    .col(ChoiceOptions::QuestionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enumeration_answers_question_id")
                    .table(EnumerationAnswers::Table)
                    .col(EnumerationAnswers::QuestionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_question_contexts_question_id")
                    .table(QuestionContexts::Table)
                    .col(QuestionContexts::QuestionId)
                    .to_owned(),
            )
            .await?;

        // 每个学生对每份问卷最多一份作答
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_student_responses_unique")
                    .table(StudentResponses::Table)
                    .col(StudentResponses::SurveyId)
                    .col(StudentResponses::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_question_answers_unique")
                    .table(QuestionAnswers::Table)
                    .col(QuestionAnswers::ResponseId)
                    .col(QuestionAnswers::QuestionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(QuestionAnswers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentResponses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EnumerationAnswers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TrueFalseAnswers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ChoiceOptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(QuestionContexts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SurveySections::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Surveys::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SectionStudents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sections::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Sections {
    #[sea_orm(iden = "sections")]
    Table,
    Id,
    TeacherId,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SectionStudents {
    #[sea_orm(iden = "section_students")]
    Table,
    Id,
    SectionId,
    StudentId,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Surveys {
    #[sea_orm(iden = "surveys")]
    Table,
    Id,
    TeacherId,
    Title,
    Description,
    Status,
    TotalPoints,
    TimeLimit,
    DueDate,
    StartDate,
    EndDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SurveySections {
    #[sea_orm(iden = "survey_sections")]
    Table,
    Id,
    SurveyId,
    SectionId,
}

#[derive(DeriveIden)]
enum Questions {
    #[sea_orm(iden = "questions")]
    Table,
    Id,
    SurveyId,
    QuestionType,
    QuestionText,
    Position,
    Required,
    Points,
}

#[derive(DeriveIden)]
enum QuestionContexts {
    #[sea_orm(iden = "question_contexts")]
    Table,
    Id,
    QuestionId,
    Kind,
    Content,
    Language,
    Position,
}

#[derive(DeriveIden)]
enum ChoiceOptions {
    #[sea_orm(iden = "choice_options")]
    Table,
    Id,
    QuestionId,
    OptionText,
    IsCorrect,
    Position,
}

#[derive(DeriveIden)]
enum TrueFalseAnswers {
    #[sea_orm(iden = "true_false_answers")]
    Table,
    Id,
    QuestionId,
    CorrectAnswer,
}

#[derive(DeriveIden)]
enum EnumerationAnswers {
    #[sea_orm(iden = "enumeration_answers")]
    Table,
    Id,
    QuestionId,
    AnswerText,
    Position,
}

#[derive(DeriveIden)]
enum StudentResponses {
    #[sea_orm(iden = "student_responses")]
    Table,
    Id,
    SurveyId,
    StudentId,
    IsSubmitted,
    StartedAt,
    SubmittedAt,
    Score,
}

#[derive(DeriveIden)]
enum QuestionAnswers {
    #[sea_orm(iden = "question_answers")]
    Table,
    Id,
    ResponseId,
    QuestionId,
    SelectedOptionId,
    TrueFalseAnswer,
    TextAnswer,
    IsCorrect,
    PointsEarned,
}
