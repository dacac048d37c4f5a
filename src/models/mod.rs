pub mod analytics;
pub mod common;
pub mod sections;
pub mod student_responses;
pub mod surveys;
pub mod users;

pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

use serde::{Deserialize, Serialize};

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    Conflict = 1009,
    InternalServerError = 1500,

    // 认证授权 2xxx
    Unauthorized = 2001,
    Forbidden = 2003,

    // 问卷 3xxx
    SurveyNotFound = 3000,
    InvalidStatusTransition = 3001,
    SurveyNotOpen = 3002,
    SectionNotFound = 3003,

    // 作答 4xxx
    ResponseNotFound = 4000,
    ResponseAlreadySubmitted = 4001,
    SubmissionIncomplete = 4002,
}

/// 应用启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
