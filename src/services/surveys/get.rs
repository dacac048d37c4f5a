use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SurveyService;
use crate::models::{ApiResponse, ErrorCode, users::entities::UserRole};
use crate::services::{current_user, error_response};

pub async fn get_survey(
    service: &SurveyService,
    request: &HttpRequest,
    survey_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    // 非本人问卷与不存在的问卷一律返回 404
    let not_found = || {
        HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SurveyNotFound,
            "Survey not found",
        ))
    };

    match user.role {
        UserRole::Student => match storage.get_student_survey(user.id, survey_id).await {
            Ok(Some(document)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                document,
                "Survey retrieved successfully",
            ))),
            Ok(None) => Ok(not_found()),
            Err(e) => Ok(error_response(&e)),
        },
        UserRole::Teacher | UserRole::Admin => {
            match storage.get_survey_document(user.id, survey_id).await {
                Ok(Some(document)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                    document,
                    "Survey retrieved successfully",
                ))),
                Ok(None) => Ok(not_found()),
                Err(e) => Ok(error_response(&e)),
            }
        }
    }
}
