use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SurveyService;
use crate::models::{
    ApiResponse,
    surveys::requests::{SurveyListParams, SurveyListQuery},
    users::entities::UserRole,
};
use crate::services::{current_user, error_response};

pub async fn list_surveys(
    service: &SurveyService,
    request: &HttpRequest,
    query: SurveyListParams,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let list_query = SurveyListQuery::from(query);

    let result = match user.role {
        UserRole::Student => storage.list_student_surveys(user.id, list_query).await,
        UserRole::Teacher | UserRole::Admin => {
            storage.list_teacher_surveys(user.id, list_query).await
        }
    };

    match result {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Survey list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
