pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod status;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::surveys::{
    entities::SurveyStatus,
    requests::{SaveSurveyRequest, SurveyListParams},
};
use crate::storage::Storage;

pub struct SurveyService {
    storage: Option<Arc<dyn Storage>>,
}

impl SurveyService {
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

    // 问卷列表：教师看自己的，学生看分配给自己的
    pub async fn list_surveys(
        &self,
        request: &HttpRequest,
        query: SurveyListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_surveys(self, request, query).await
    }

    pub async fn create_survey(
        &self,
        request: &HttpRequest,
        req: SaveSurveyRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_survey(self, request, req).await
    }

    // 教师获取完整文档，学生获取不含答案键的视图
    pub async fn get_survey(
        &self,
        request: &HttpRequest,
        survey_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_survey(self, request, survey_id).await
    }

    // 编辑器整体保存
    pub async fn update_survey(
        &self,
        request: &HttpRequest,
        survey_id: i64,
        req: SaveSurveyRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_survey(self, request, survey_id, req).await
    }

    pub async fn delete_survey(
        &self,
        request: &HttpRequest,
        survey_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_survey(self, request, survey_id).await
    }

    // 发布 / 关闭
    pub async fn change_status(
        &self,
        request: &HttpRequest,
        survey_id: i64,
        target: SurveyStatus,
    ) -> ActixResult<HttpResponse> {
        status::change_status(self, request, survey_id, target).await
    }
}
