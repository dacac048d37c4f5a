pub mod analytics;
pub mod responses;
pub mod sections;
pub mod surveys;

pub use analytics::AnalyticsService;
pub use responses::ResponseService;
pub use sections::SectionService;
pub use surveys::SurveyService;

use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use std::sync::Arc;
use tracing::error;

use crate::errors::SurveyError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, users::entities::CurrentUser};
use crate::utils::{Clock, SystemClock};

/// 业务错误对应的 HTTP 状态码
pub(crate) fn error_status(err: &SurveyError) -> StatusCode {
    match err {
        SurveyError::Authentication(_) => StatusCode::UNAUTHORIZED,
        SurveyError::Authorization(_) => StatusCode::FORBIDDEN,
        SurveyError::Validation(_) => StatusCode::BAD_REQUEST,
        SurveyError::NotFound(_) => StatusCode::NOT_FOUND,
        SurveyError::Conflict(_)
        | SurveyError::AlreadySubmitted(_)
        | SurveyError::SurveyNotOpen(_)
        | SurveyError::InvalidTransition(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 把业务错误转换为统一响应，内部错误只返回通用提示
pub(crate) fn error_response(err: &SurveyError) -> HttpResponse {
    let status = error_status(err);
    let message = if err.is_internal() {
        error!("{}", err.format_simple());
        "Internal server error".to_string()
    } else {
        err.message().to_string()
    };
    HttpResponse::build(status).json(ApiResponse::error_empty(ErrorCode::from(err), message))
}

/// 取出当前用户，缺失时返回 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<CurrentUser, HttpResponse> {
    RequireJWT::extract_current_user(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        ))
    })
}

pub(crate) fn request_clock(request: &HttpRequest) -> Arc<dyn Clock> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn Clock>>>()
        .map(|data| data.get_ref().clone())
        .unwrap_or_else(|| Arc::new(SystemClock))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_status(&SurveyError::authorization("x")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            error_status(&SurveyError::survey_not_open("x")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&SurveyError::already_submitted("x")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&SurveyError::validation("x")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&SurveyError::database_operation("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_error_hides_details() {
        let resp = error_response(&SurveyError::database_operation("secret path"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
