//! # 医院管理数据库模块
//!
//! 负责科室、医生、患者、病房、住院与就诊数据的存储，提供PostgreSQL连接池、
//! 列表查询组合器、各实体的读写操作以及统计聚合。

pub mod connection;
pub mod filter;
pub mod models;
pub mod queries;
pub mod schema;
pub mod stats;

// 重新导出主要类型
pub use connection::{DatabasePool, PoolSettings};
pub use filter::{Filter, ListQuery};
pub use models::*;
pub use schema::create_tables;
