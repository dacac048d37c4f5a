use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::student_responses::requests::SubmitAnswersRequest;
use crate::models::surveys::entities::SurveyStatus;
use crate::models::surveys::requests::{SaveSurveyRequest, SurveyListParams};
use crate::models::users::entities::UserRole;
use crate::services::{AnalyticsService, ResponseService, SurveyService};
use crate::utils::SafeSurveyIdI64;

// 懒加载的全局服务实例
static SURVEY_SERVICE: Lazy<SurveyService> = Lazy::new(SurveyService::new_lazy);
static RESPONSE_SERVICE: Lazy<ResponseService> = Lazy::new(ResponseService::new_lazy);
static ANALYTICS_SERVICE: Lazy<AnalyticsService> = Lazy::new(AnalyticsService::new_lazy);

// HTTP处理程序
pub async fn list_surveys(
    req: HttpRequest,
    query: web::Query<SurveyListParams>,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE.list_surveys(&req, query.into_inner()).await
}

pub async fn create_survey(
    req: HttpRequest,
    survey_data: web::Json<SaveSurveyRequest>,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE
        .create_survey(&req, survey_data.into_inner())
        .await
}

pub async fn get_survey(req: HttpRequest, survey_id: SafeSurveyIdI64) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE.get_survey(&req, survey_id.0).await
}

pub async fn update_survey(
    req: HttpRequest,
    survey_id: SafeSurveyIdI64,
    survey_data: web::Json<SaveSurveyRequest>,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE
        .update_survey(&req, survey_id.0, survey_data.into_inner())
        .await
}

pub async fn delete_survey(
    req: HttpRequest,
    survey_id: SafeSurveyIdI64,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE.delete_survey(&req, survey_id.0).await
}

pub async fn publish_survey(
    req: HttpRequest,
    survey_id: SafeSurveyIdI64,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE
        .change_status(&req, survey_id.0, SurveyStatus::Published)
        .await
}

pub async fn close_survey(
    req: HttpRequest,
    survey_id: SafeSurveyIdI64,
) -> ActixResult<HttpResponse> {
    SURVEY_SERVICE
        .change_status(&req, survey_id.0, SurveyStatus::Closed)
        .await
}

pub async fn get_my_answers(
    req: HttpRequest,
    survey_id: SafeSurveyIdI64,
) -> ActixResult<HttpResponse> {
    RESPONSE_SERVICE.get_my_answers(&req, survey_id.0).await
}

pub async fn submit_answers(
    req: HttpRequest,
    survey_id: SafeSurveyIdI64,
    answers: web::Json<SubmitAnswersRequest>,
) -> ActixResult<HttpResponse> {
    RESPONSE_SERVICE
        .submit_answers(&req, survey_id.0, answers.into_inner())
        .await
}

pub async fn list_responses(
    req: HttpRequest,
    survey_id: SafeSurveyIdI64,
) -> ActixResult<HttpResponse> {
    RESPONSE_SERVICE.list_responses(&req, survey_id.0).await
}

pub async fn grade_survey(
    req: HttpRequest,
    survey_id: SafeSurveyIdI64,
) -> ActixResult<HttpResponse> {
    RESPONSE_SERVICE.grade_survey(&req, survey_id.0).await
}

pub async fn survey_analytics(
    req: HttpRequest,
    survey_id: SafeSurveyIdI64,
) -> ActixResult<HttpResponse> {
    ANALYTICS_SERVICE.survey_analytics(&req, survey_id.0).await
}

// 配置路由
pub fn configure_surveys_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/surveys")
            // 先认证，再关闭已过截止时间的问卷
            .wrap(middlewares::AutoCloseSurveys)
            .wrap(middlewares::RequireJWT)
            .service(
                // 教师查询自己的问卷，学生查询分配给自己的问卷
                web::resource("").route(web::get().to(list_surveys)).route(
                    web::post()
                        .to(create_survey)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/{survey_id}")
                    .route(web::get().to(get_survey))
                    .route(
                        web::put()
                            .to(update_survey)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_survey)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            )
            .service(
                web::resource("/{survey_id}/publish").route(
                    web::post()
                        .to(publish_survey)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/{survey_id}/close").route(
                    web::post()
                        .to(close_survey)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                // 学生作答
                web::resource("/{survey_id}/answers")
                    .route(
                        web::get()
                            .to(get_my_answers)
                            .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                    )
                    .route(
                        web::post()
                            .to(submit_answers)
                            .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                    ),
            )
            .service(
                web::resource("/{survey_id}/responses").route(
                    web::get()
                        .to(list_responses)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/{survey_id}/grade").route(
                    web::post()
                        .to(grade_survey)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/{survey_id}/analytics").route(
                    web::get()
                        .to(survey_analytics)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            ),
    );
}
