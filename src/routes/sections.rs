use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::sections::requests::{CreateSectionRequest, EnrollStudentRequest};
use crate::models::users::entities::UserRole;
use crate::services::SectionService;
use crate::utils::SafeSectionIdI64;

static SECTION_SERVICE: Lazy<SectionService> = Lazy::new(SectionService::new_lazy);

pub async fn list_sections(req: HttpRequest) -> ActixResult<HttpResponse> {
    SECTION_SERVICE.list_sections(&req).await
}

pub async fn create_section(
    req: HttpRequest,
    section_data: web::Json<CreateSectionRequest>,
) -> ActixResult<HttpResponse> {
    SECTION_SERVICE
        .create_section(&req, section_data.into_inner())
        .await
}

pub async fn enroll_student(
    req: HttpRequest,
    section_id: SafeSectionIdI64,
    enroll_data: web::Json<EnrollStudentRequest>,
) -> ActixResult<HttpResponse> {
    SECTION_SERVICE
        .enroll_student(&req, section_id.0, enroll_data.into_inner())
        .await
}

// 配置路由，班级名单只对教师开放
pub fn configure_sections_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/sections")
            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_sections))
                    .route(web::post().to(create_section)),
            )
            .service(
                web::resource("/{section_id}/students").route(web::post().to(enroll_student)),
            ),
    );
}
