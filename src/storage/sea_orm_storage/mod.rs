//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 每个会修改多行数据的操作都在同一个事务内完成。

mod analytics;
mod responses;
mod sections;
mod surveys;

#[cfg(test)]
pub(crate) mod tests;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{Result, SurveyError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 使用全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        Self::connect(&AppConfig::get().database).await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SurveyError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SurveyError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SurveyError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SurveyError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SurveyError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::engine::answers::AnswerFields;
use crate::engine::builder::SurveyDraft;
use crate::models::{
    analytics::responses::SurveyAnalytics,
    sections::entities::Section,
    student_responses::responses::{GradingSummary, ResponseDetail, ResponseSummary, SubmitOutcome},
    surveys::{
        entities::{Survey, SurveyStatus},
        requests::SurveyListQuery,
        responses::{StudentSurveyDocument, SurveyDocument, SurveyListResponse},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 班级模块
    async fn create_section(&self, teacher_id: i64, name: &str) -> Result<Section> {
        self.create_section_impl(teacher_id, name).await
    }

    async fn enroll_student(
        &self,
        teacher_id: i64,
        section_id: i64,
        student_id: i64,
    ) -> Result<()> {
        self.enroll_student_impl(teacher_id, section_id, student_id)
            .await
    }

    async fn list_teacher_sections(&self, teacher_id: i64) -> Result<Vec<Section>> {
        self.list_teacher_sections_impl(teacher_id).await
    }

    // 问卷模块
    async fn create_survey(
        &self,
        teacher_id: i64,
        draft: SurveyDraft,
        now: DateTime<Utc>,
    ) -> Result<SurveyDocument> {
        self.create_survey_impl(teacher_id, draft, now).await
    }

    async fn save_survey(
        &self,
        teacher_id: i64,
        survey_id: i64,
        draft: SurveyDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<SurveyDocument>> {
        self.save_survey_impl(teacher_id, survey_id, draft, now)
            .await
    }

    async fn get_survey_document(
        &self,
        teacher_id: i64,
        survey_id: i64,
    ) -> Result<Option<SurveyDocument>> {
        self.get_survey_document_impl(teacher_id, survey_id).await
    }

    async fn list_teacher_surveys(
        &self,
        teacher_id: i64,
        query: SurveyListQuery,
    ) -> Result<SurveyListResponse> {
        self.list_teacher_surveys_impl(teacher_id, query).await
    }

    async fn delete_survey(&self, teacher_id: i64, survey_id: i64) -> Result<bool> {
        self.delete_survey_impl(teacher_id, survey_id).await
    }

    async fn set_survey_status(
        &self,
        teacher_id: i64,
        survey_id: i64,
        target: SurveyStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Survey>> {
        self.set_survey_status_impl(teacher_id, survey_id, target, now)
            .await
    }

    async fn sweep_overdue(&self, now: DateTime<Utc>) -> Result<u64> {
        self.sweep_overdue_impl(now).await
    }

    async fn get_student_survey(
        &self,
        student_id: i64,
        survey_id: i64,
    ) -> Result<Option<StudentSurveyDocument>> {
        self.get_student_survey_impl(student_id, survey_id).await
    }

    async fn list_student_surveys(
        &self,
        student_id: i64,
        query: SurveyListQuery,
    ) -> Result<SurveyListResponse> {
        self.list_student_surveys_impl(student_id, query).await
    }

    // 作答模块
    async fn save_draft(
        &self,
        student_id: i64,
        survey_id: i64,
        fields: &AnswerFields,
        now: DateTime<Utc>,
    ) -> Result<ResponseDetail> {
        self.save_draft_impl(student_id, survey_id, fields, now)
            .await
    }

    async fn submit_response(
        &self,
        student_id: i64,
        survey_id: i64,
        fields: &AnswerFields,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome> {
        self.submit_response_impl(student_id, survey_id, fields, now)
            .await
    }

    async fn get_my_response(
        &self,
        student_id: i64,
        survey_id: i64,
    ) -> Result<Option<ResponseDetail>> {
        self.get_my_response_impl(student_id, survey_id).await
    }

    async fn list_responses(
        &self,
        teacher_id: i64,
        survey_id: i64,
    ) -> Result<Option<Vec<ResponseSummary>>> {
        self.list_responses_impl(teacher_id, survey_id).await
    }

    async fn grade_survey(
        &self,
        teacher_id: i64,
        survey_id: i64,
    ) -> Result<Option<GradingSummary>> {
        self.grade_survey_impl(teacher_id, survey_id).await
    }

    // 统计模块
    async fn survey_analytics(
        &self,
        teacher_id: i64,
        survey_id: i64,
    ) -> Result<Option<SurveyAnalytics>> {
        self.survey_analytics_impl(teacher_id, survey_id).await
    }
}
