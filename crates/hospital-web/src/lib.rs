//! # 医院管理 Web 服务
//!
//! 基于 axum 的 REST 接口：请求体提取与校验、统一响应封装、各实体处理器以及请求指标。

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod response;
pub mod server;
pub mod state;

pub use metrics::HttpMetrics;
pub use response::{ApiError, ApiResponse, ApiResult};
pub use server::{create_app, WebServer};
pub use state::AppState;
