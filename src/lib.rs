//! WebSurvey - 问卷作答与评分服务
//!
//! 基于 Actix Web 构建的问卷编写、作答生命周期与自动评分后端。
//!
//! # 架构
//! - `config`: 配置管理
//! - `engine`: 与存储无关的业务规则（状态流转、答案路由、校验、评分、统计）
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权与过期关闭中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod config;
pub mod engine;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
