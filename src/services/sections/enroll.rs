use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SectionService;
use crate::models::{ApiResponse, sections::requests::EnrollStudentRequest};
use crate::services::{current_user, error_response};

pub async fn enroll_student(
    service: &SectionService,
    request: &HttpRequest,
    section_id: i64,
    req: EnrollStudentRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage
        .enroll_student(user.id, section_id, req.student_id)
        .await
    {
        Ok(()) => {
            info!(
                "Student {} enrolled in section {} by teacher {}",
                req.student_id, section_id, user.id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success_empty(
                "Student enrolled successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
