/*!
 * 过期问卷自动关闭中间件
 *
 * 在请求进入问卷相关处理程序之前，把所有截止时间已过的已发布问卷批量关闭，
 * 使后续的列表、详情与作答都看到最新状态。
 *
 * 依赖 app_data 中的 `Arc<dyn Storage>` 与 `Arc<dyn Clock>`。
 * 关闭失败只记录日志，不影响请求本身。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    dev::{ServiceRequest, ServiceResponse},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::storage::Storage;
use crate::utils::Clock;

#[derive(Clone)]
pub struct AutoCloseSurveys;

impl<S, B> Transform<S, ServiceRequest> for AutoCloseSurveys
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AutoCloseSurveysMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AutoCloseSurveysMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AutoCloseSurveysMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AutoCloseSurveysMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            let storage = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|data| data.get_ref().clone());
            let clock = req
                .app_data::<web::Data<Arc<dyn Clock>>>()
                .map(|data| data.get_ref().clone());

            match (storage, clock) {
                (Some(storage), Some(clock)) => match storage.sweep_overdue(clock.now()).await {
                    Ok(0) => {}
                    Ok(closed) => debug!("Auto-closed {} overdue surveys", closed),
                    Err(e) => error!("Failed to close overdue surveys: {}", e),
                },
                _ => warn!("AutoCloseSurveys: storage or clock missing from app data"),
            }

            srv.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::surveys::entities::SurveyStatus;
    use crate::storage::sea_orm_storage::tests::{
        TEACHER, published_survey, section_with, setup, t0,
    };
    use crate::utils::FixedClock;
    use actix_web::{App, HttpResponse, test};
    use serde_json::json;

    async fn survey_status(storage: &Arc<dyn Storage>, survey_id: i64) -> SurveyStatus {
        storage
            .get_survey_document(TEACHER, survey_id)
            .await
            .unwrap()
            .unwrap()
            .survey
            .status
    }

    #[actix_web::test]
    async fn test_overdue_survey_is_closed_before_handler() {
        let db = setup().await;
        let section = section_with(&db.storage, &[]).await;
        let doc = published_survey(
            &db.storage,
            section,
            json!({"due_date": "2025-03-01T09:00:00Z"}),
        )
        .await;

        let clock = Arc::new(FixedClock::new(t0()));
        let storage: Arc<dyn Storage> = Arc::new(db.storage.clone());
        let app_clock: Arc<dyn Clock> = clock.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .app_data(web::Data::new(app_clock))
                .service(
                    web::scope("/surveys")
                        .wrap(AutoCloseSurveys)
                        .route("", web::get().to(HttpResponse::Ok)),
                ),
        )
        .await;

        // 截止前不受影响
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/surveys").to_request()).await;
        assert!(resp.status().is_success());
        assert_eq!(survey_status(&storage, doc.survey.id).await, SurveyStatus::Published);

        clock.advance(chrono::Duration::hours(2));
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/surveys").to_request()).await;
        assert!(resp.status().is_success());
        assert_eq!(survey_status(&storage, doc.survey.id).await, SurveyStatus::Closed);
    }

    #[actix_web::test]
    async fn test_missing_app_data_does_not_fail_request() {
        let app = test::init_service(
            App::new().service(
                web::scope("/surveys")
                    .wrap(AutoCloseSurveys)
                    .route("", web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/surveys").to_request()).await;
        assert!(resp.status().is_success());
    }
}
