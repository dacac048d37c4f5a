use crate::config::AppConfig;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const ACCESS_TOKEN_TYPE: &str = "access";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub role: String,       // 用户角色
    pub token_type: String, // token类型，本服务只接受 "access"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

/// 令牌由外部身份服务签发，这里只负责校验
pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    // 生成 Access Token（用于联调和测试）
    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::generate_with_secret(
            &Self::get_secret(),
            user_id,
            role,
            chrono::Duration::minutes(config.jwt.access_token_expiry),
        )
    }

    pub fn generate_with_secret(
        secret: &str,
        user_id: i64,
        role: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_with_secret(&Self::get_secret(), token)
    }

    pub fn verify_with_secret(
        secret: &str,
        token: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let claims = decode::<Claims>(token, &decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)?;

        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_generate_and_verify() {
        let token =
            JwtUtils::generate_with_secret(SECRET, 42, "teacher", chrono::Duration::minutes(5))
                .unwrap();
        let claims = JwtUtils::verify_with_secret(SECRET, &token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, "teacher");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token =
            JwtUtils::generate_with_secret(SECRET, 42, "student", chrono::Duration::minutes(5))
                .unwrap();
        assert!(JwtUtils::verify_with_secret("other", &token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token =
            JwtUtils::generate_with_secret(SECRET, 1, "student", chrono::Duration::minutes(-10))
                .unwrap();
        assert!(JwtUtils::verify_with_secret(SECRET, &token).is_err());
    }
}
