use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SurveyService, create::configured_offset};
use crate::engine::builder::SurveyDraft;
use crate::models::{ApiResponse, ErrorCode, surveys::requests::SaveSurveyRequest};
use crate::services::{current_user, error_response, request_clock};

pub async fn update_survey(
    service: &SurveyService,
    request: &HttpRequest,
    survey_id: i64,
    req: SaveSurveyRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let draft = match SurveyDraft::from_request(req, configured_offset()) {
        Ok(draft) => draft,
        Err(e) => return Ok(error_response(&e)),
    };
    let replaces_questions = draft.plan.is_some();

    let storage = service.get_storage(request);
    let now = request_clock(request).now();

    match storage.save_survey(user.id, survey_id, draft, now).await {
        Ok(Some(document)) => {
            info!(
                "Survey {} saved by teacher {} (questions replaced: {})",
                survey_id, user.id, replaces_questions
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(document, "Survey saved successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SurveyNotFound,
            "Survey not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
