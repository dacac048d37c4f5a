//! 路径参数提取器
//!
//! 路径中的 ID 必须是正整数，否则直接返回 400。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(name).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                format!("Invalid path parameter '{name}': {raw}"),
            ));
            Err(InternalError::from_response("invalid path parameter", response).into())
        }
    }
}

macro_rules! define_safe_id_extractor {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_positive_id(req, $param).map($name))
                }
            }
        )*
    };
}

define_safe_id_extractor! {
    SafeSectionIdI64 => "section_id",
    SafeSurveyIdI64 => "survey_id",
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_valid_id() {
        let req = TestRequest::default()
            .param("survey_id", "12")
            .to_http_request();
        let id = SafeSurveyIdI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 12);
    }

    #[actix_web::test]
    async fn test_invalid_id() {
        for raw in ["0", "-3", "abc"] {
            let req = TestRequest::default().param("section_id", raw).to_http_request();
            assert!(SafeSectionIdI64::extract(&req).await.is_err());
        }
    }
}
