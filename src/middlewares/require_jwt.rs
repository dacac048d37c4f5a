/*!
 * JWT 认证中间件
 *
 * 令牌由外部身份服务签发，本中间件只验证签名与有效期，
 * 并把令牌中的用户 ID 与角色作为 `CurrentUser` 放入请求扩展。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RequireJWT;
 *
 * App::new().service(
 *     web::scope("/api/v1/surveys")
 *         .wrap(RequireJWT)
 *         .route("", web::get().to(list_surveys)),
 * )
 * ```
 *
 * 在处理程序中：
 *
 * ```rust,ignore
 * let user = RequireJWT::extract_current_user(&req)?;
 * ```
 *
 * ## 认证流程
 *
 * 1. 客户端在请求头中包含 `Authorization: Bearer <JWT_TOKEN>`
 * 2. 中间件验证令牌，解析 `sub` 与 `role`
 * 3. 验证成功则继续处理请求，否则返回 401
 */

use crate::models::users::entities::{CurrentUser, UserRole};
use crate::models::ErrorCode;
use crate::utils::jwt::{Claims, JwtUtils};
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

// 从 Claims 构造当前用户
fn current_user_from_claims(claims: &Claims) -> Result<CurrentUser, String> {
    let id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| "Invalid user ID in JWT".to_string())?;
    let role = claims
        .role
        .parse::<UserRole>()
        .map_err(|_| format!("Invalid role in JWT: {}", claims.role))?;
    Ok(CurrentUser { id, role })
}

// 辅助函数：提取并验证 JWT access token
fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<CurrentUser, String> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    current_user_from_claims(&claims)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
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
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req) {
                Ok(user) => {
                    debug!(
                        "JWT authentication successful for ID: {} ({})",
                        user.id, user.role
                    );
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireJWT {
    /// 从请求扩展中提取当前用户
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_current_user(req: &actix_web::HttpRequest) -> Option<CurrentUser> {
        req.extensions().get::<CurrentUser>().cloned()
    }

    /// 从请求扩展中提取用户ID
    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<CurrentUser>().map(|user| user.id)
    }

    /// 从请求扩展中提取用户角色
    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        req.extensions()
            .get::<CurrentUser>()
            .map(|user| user.role.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str, role: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            role: role.to_string(),
            token_type: "access".to_string(),
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_current_user_from_claims() {
        let user = current_user_from_claims(&claims("7", "teacher")).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.role, UserRole::Teacher);
    }

    #[test]
    fn test_bad_claims_are_rejected() {
        assert!(current_user_from_claims(&claims("abc", "student")).is_err());
        assert!(current_user_from_claims(&claims("7", "guest")).is_err());
    }
}
