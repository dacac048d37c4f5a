use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ResponseService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response};

pub async fn list_responses(
    service: &ResponseService,
    request: &HttpRequest,
    survey_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.list_responses(user.id, survey_id).await {
        Ok(Some(responses)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            responses,
            "Responses retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SurveyNotFound,
            "Survey not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
