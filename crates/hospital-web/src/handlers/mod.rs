//! HTTP处理器
//!
//! 写操作在单个事务内完成，出错时事务随丢弃回滚。

pub mod admission;
pub mod department;
pub mod doctor;
pub mod patient;
pub mod stats;
pub mod system;
pub mod visit;
pub mod ward;

/// 列表默认每页条数
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// 患者列表默认每页条数
pub const PATIENT_PAGE_SIZE: i64 = 20;
