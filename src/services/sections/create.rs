use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SectionService;
use crate::models::{ApiResponse, sections::requests::CreateSectionRequest};
use crate::services::{current_user, error_response};

pub async fn create_section(
    service: &SectionService,
    request: &HttpRequest,
    req: CreateSectionRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.create_section(user.id, &req.name).await {
        Ok(section) => {
            info!("Section {} created by teacher {}", section.id, user.id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(section, "Section created successfully")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
