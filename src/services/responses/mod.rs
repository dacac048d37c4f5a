pub mod answers;
pub mod grade;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::student_responses::requests::SubmitAnswersRequest;
use crate::storage::Storage;

pub struct ResponseService {
    storage: Option<Arc<dyn Storage>>,
}

impl ResponseService {
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

    // 学生获取自己的作答
    pub async fn get_my_answers(
        &self,
        request: &HttpRequest,
        survey_id: i64,
    ) -> ActixResult<HttpResponse> {
        answers::get_my_answers(self, request, survey_id).await
    }

    // 学生保存草稿或提交
    pub async fn submit_answers(
        &self,
        request: &HttpRequest,
        survey_id: i64,
        req: SubmitAnswersRequest,
    ) -> ActixResult<HttpResponse> {
        answers::submit_answers(self, request, survey_id, req).await
    }

    // 教师查看作答列表
    pub async fn list_responses(
        &self,
        request: &HttpRequest,
        survey_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_responses(self, request, survey_id).await
    }

    // 教师触发自动评分
    pub async fn grade_survey(
        &self,
        request: &HttpRequest,
        survey_id: i64,
    ) -> ActixResult<HttpResponse> {
        grade::grade_survey(self, request, survey_id).await
    }
}
