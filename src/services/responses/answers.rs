use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ResponseService;
use crate::engine::answers::AnswerFields;
use crate::models::{
    ApiResponse, ErrorCode,
    student_responses::{
        requests::{AnswerAction, SubmitAnswersRequest},
        responses::{SubmissionIncomplete, SubmitOutcome},
    },
};
use crate::services::{current_user, error_response, request_clock};

pub async fn get_my_answers(
    service: &ResponseService,
    request: &HttpRequest,
    survey_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.get_my_response(user.id, survey_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Response retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ResponseNotFound,
            "Response not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn submit_answers(
    service: &ResponseService,
    request: &HttpRequest,
    survey_id: i64,
    req: SubmitAnswersRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let now = request_clock(request).now();
    let fields = AnswerFields::from_json(&req.answers);

    match req.action {
        AnswerAction::SaveDraft => match storage.save_draft(user.id, survey_id, &fields, now).await
        {
            Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                detail,
                "Draft saved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        },
        AnswerAction::Submit => {
            match storage
                .submit_response(user.id, survey_id, &fields, now)
                .await
            {
                Ok(SubmitOutcome::Submitted(detail)) => {
                    info!(
                        "Student {} submitted response {} for survey {}",
                        user.id, detail.response.id, survey_id
                    );
                    Ok(HttpResponse::Ok().json(ApiResponse::success(
                        detail,
                        "Response submitted successfully",
                    )))
                }
                Ok(SubmitOutcome::Incomplete(unmet)) => {
                    info!(
                        "Student {} submission for survey {} rejected: {} required questions unanswered",
                        user.id,
                        survey_id,
                        unmet.len()
                    );
                    Ok(
                        HttpResponse::UnprocessableEntity().json(ApiResponse::error(
                            ErrorCode::SubmissionIncomplete,
                            SubmissionIncomplete { unmet },
                            "Required questions are not answered",
                        )),
                    )
                }
                Err(e) => Ok(error_response(&e)),
            }
        }
    }
}
