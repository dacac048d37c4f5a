pub mod create;
pub mod enroll;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::sections::requests::{CreateSectionRequest, EnrollStudentRequest};
use crate::storage::Storage;

pub struct SectionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SectionService {
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

    pub async fn list_sections(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_sections(self, request).await
    }

    pub async fn create_section(
        &self,
        request: &HttpRequest,
        req: CreateSectionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_section(self, request, req).await
    }

    // 学生入班
    pub async fn enroll_student(
        &self,
        request: &HttpRequest,
        section_id: i64,
        req: EnrollStudentRequest,
    ) -> ActixResult<HttpResponse> {
        enroll::enroll_student(self, request, section_id, req).await
    }
}
