//! 问卷作答与评分引擎
//!
//! 纯函数部分，不访问数据库：
//! - `lifecycle`: 问卷状态机与作答窗口判断
//! - `builder`: 编辑器文档校验与题目排布
//! - `answers`: 答案字段解析与按题型路由
//! - `validation`: 提交前的必答校验
//! - `scoring`: 单题评分
//! - `analytics`: 统计聚合

pub mod analytics;
pub mod answers;
pub mod builder;
pub mod lifecycle;
pub mod scoring;
pub mod validation;
