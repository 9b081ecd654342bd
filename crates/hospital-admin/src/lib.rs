//! # 医院管理运维模块
//!
//! 提供配置加载与校验、日志初始化

pub mod config;
pub mod logging;

pub use config::{
    ConfigValidator, DatabaseConfig, HospitalConfig, LogFormat, LoggingConfig, ServerConfig,
    WebConfig,
};
pub use logging::init_logging;
