use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::SurveyError;
use crate::models::ErrorCode;

// 统一的API响应结构
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

impl From<&SurveyError> for ErrorCode {
    fn from(err: &SurveyError) -> Self {
        match err {
            SurveyError::Validation(_) => ErrorCode::ValidationFailed,
            SurveyError::NotFound(_) => ErrorCode::NotFound,
            SurveyError::Authentication(_) => ErrorCode::Unauthorized,
            SurveyError::Authorization(_) => ErrorCode::Forbidden,
            SurveyError::Conflict(_) => ErrorCode::Conflict,
            SurveyError::InvalidTransition(_) => ErrorCode::InvalidStatusTransition,
            SurveyError::SurveyNotOpen(_) => ErrorCode::SurveyNotOpen,
            SurveyError::AlreadySubmitted(_) => ErrorCode::ResponseAlreadySubmitted,
            _ => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            ErrorCode::from(&SurveyError::conflict("dup")),
            ErrorCode::Conflict
        );
        assert_eq!(
            ErrorCode::from(&SurveyError::database_operation("io")),
            ErrorCode::InternalServerError
        );
    }

    #[test]
    fn test_error_empty_has_no_data() {
        let resp = ApiResponse::error_empty(ErrorCode::NotFound, "问卷不存在");
        assert_eq!(resp.code, ErrorCode::NotFound as i32);
        assert!(resp.data.is_none());
    }
}
