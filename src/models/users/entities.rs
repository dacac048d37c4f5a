use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色（由外部身份服务写入令牌）
#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Student, // 学生
    Teacher, // 教师
    Admin,   // 管理员
}

impl UserRole {
    pub const STUDENT: &'static str = "student";
    pub const TEACHER: &'static str = "teacher";
    pub const ADMIN: &'static str = "admin";

    pub fn teacher_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher, &Self::Admin]
    }
    pub fn student_roles() -> &'static [&'static UserRole] {
        &[&Self::Student]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Student, &Self::Teacher, &Self::Admin]
    }

    /// 教师与管理员都可以编写问卷
    pub fn is_author(&self) -> bool {
        matches!(self, UserRole::Teacher | UserRole::Admin)
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: student, teacher, admin"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Teacher => write!(f, "{}", UserRole::TEACHER),
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::ADMIN => Ok(UserRole::Admin),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

/// 通过令牌认证后的当前用户
///
/// 用户注册与登录属于外部身份服务，本服务只信任令牌中的 `sub` 与 `role`。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CurrentUser {
    pub id: i64,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in UserRole::all_roles() {
            let parsed: UserRole = role.to_string().parse().unwrap();
            assert_eq!(&parsed, *role);
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!("user".parse::<UserRole>().is_err());
        assert!(serde_json::from_str::<UserRole>("\"guest\"").is_err());
    }

    #[test]
    fn test_author_roles() {
        assert!(UserRole::Teacher.is_author());
        assert!(UserRole::Admin.is_author());
        assert!(!UserRole::Student.is_author());
    }
}
