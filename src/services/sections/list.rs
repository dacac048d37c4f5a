use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SectionService;
use crate::models::ApiResponse;
use crate::services::{current_user, error_response};

pub async fn list_sections(
    service: &SectionService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.list_teacher_sections(user.id).await {
        Ok(sections) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            sections,
            "Section list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
