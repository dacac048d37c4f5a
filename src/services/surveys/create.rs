use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{FixedOffset, Offset, Utc};
use tracing::info;

use super::SurveyService;
use crate::config::AppConfig;
use crate::engine::builder::SurveyDraft;
use crate::models::{ApiResponse, surveys::requests::SaveSurveyRequest};
use crate::services::{current_user, error_response, request_clock};

pub(super) fn configured_offset() -> FixedOffset {
    AppConfig::get()
        .timezone_offset()
        .unwrap_or_else(|| Utc.fix())
}

pub async fn create_survey(
    service: &SurveyService,
    request: &HttpRequest,
    req: SaveSurveyRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    // 校验在写库之前完成，任何一题有误都不会写入
    let draft = match SurveyDraft::from_request(req, configured_offset()) {
        Ok(draft) => draft,
        Err(e) => return Ok(error_response(&e)),
    };

    let storage = service.get_storage(request);
    let now = request_clock(request).now();

    match storage.create_survey(user.id, draft, now).await {
        Ok(document) => {
            info!(
                "Survey {} created by teacher {}",
                document.survey.id, user.id
            );
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(document, "Survey created successfully")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
