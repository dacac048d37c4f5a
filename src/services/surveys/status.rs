use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SurveyService;
use crate::models::{ApiResponse, ErrorCode, surveys::entities::SurveyStatus};
use crate::services::{current_user, error_response, request_clock};

pub async fn change_status(
    service: &SurveyService,
    request: &HttpRequest,
    survey_id: i64,
    target: SurveyStatus,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let now = request_clock(request).now();

    match storage
        .set_survey_status(user.id, survey_id, target, now)
        .await
    {
        Ok(Some(survey)) => {
            info!(
                "Survey {} status set to {} by teacher {}",
                survey_id, survey.status, user.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                survey,
                format!("Survey {target}"),
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SurveyNotFound,
            "Survey not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
