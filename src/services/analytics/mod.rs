use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, error_response};
use crate::storage::Storage;

pub struct AnalyticsService {
    storage: Option<Arc<dyn Storage>>,
}

impl AnalyticsService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 按题目汇总已提交作答
    pub async fn survey_analytics(
        &self,
        request: &HttpRequest,
        survey_id: i64,
    ) -> ActixResult<HttpResponse> {
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };
        let storage = self.get_storage(request);

        match storage.survey_analytics(user.id, survey_id).await {
            Ok(Some(analytics)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                analytics,
                "Analytics retrieved successfully",
            ))),
            Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SurveyNotFound,
                "Survey not found",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }
}
