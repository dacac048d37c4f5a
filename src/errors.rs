//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_survey_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum SurveyError {
            $($variant(String),)*
        }

        impl SurveyError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SurveyError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SurveyError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SurveyError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SurveyError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SurveyError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_survey_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    Authentication("E009", "Authentication Error"),
    Authorization("E010", "Authorization Error"),
    Conflict("E011", "Integrity Conflict"),
    InvalidTransition("E012", "Invalid Status Transition"),
    SurveyNotOpen("E013", "Survey Not Open"),
    AlreadySubmitted("E014", "Response Already Submitted"),
}

impl SurveyError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为内部错误（不应把细节暴露给客户端）
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            SurveyError::DatabaseConfig(_)
                | SurveyError::DatabaseConnection(_)
                | SurveyError::DatabaseOperation(_)
        )
    }
}

impl fmt::Display for SurveyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SurveyError {}

// 唯一约束冲突单独映射为 Conflict，其余数据库错误统一为 DatabaseOperation
impl From<sea_orm::DbErr> for SurveyError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                SurveyError::Conflict(detail)
            }
            _ => SurveyError::DatabaseOperation(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SurveyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SurveyError::database_config("test").code(), "E001");
        assert_eq!(SurveyError::validation("test").code(), "E005");
        assert_eq!(SurveyError::authorization("test").code(), "E010");
        assert_eq!(SurveyError::conflict("test").code(), "E011");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SurveyError::survey_not_open("test").error_type(),
            "Survey Not Open"
        );
        assert_eq!(
            SurveyError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = SurveyError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = SurveyError::already_submitted("response 3");
        let formatted = err.format_simple();
        assert!(formatted.contains("Response Already Submitted"));
        assert!(formatted.contains("response 3"));
    }

    #[test]
    fn test_internal_errors_are_flagged() {
        assert!(SurveyError::database_operation("boom").is_internal());
        assert!(!SurveyError::not_found("survey").is_internal());
    }

    #[test]
    fn test_db_error_maps_to_database_operation() {
        let err: SurveyError = sea_orm::DbErr::Custom("disk full".to_string()).into();
        assert!(matches!(err, SurveyError::DatabaseOperation(_)));
        assert!(err.is_internal());
    }
}
