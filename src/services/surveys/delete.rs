use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SurveyService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response};

pub async fn delete_survey(
    service: &SurveyService,
    request: &HttpRequest,
    survey_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.delete_survey(user.id, survey_id).await {
        Ok(true) => {
            info!("Survey {} deleted by teacher {}", survey_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Survey deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SurveyNotFound,
            "Survey not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
