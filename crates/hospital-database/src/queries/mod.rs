//! 数据库查询操作
//!
//! 每个函数接收 `&mut PgConnection`，既可以在事务内调用，也可以使用连接池中的普通连接。

pub mod admission;
pub mod department;
pub mod doctor;
pub mod patient;
pub mod visit;
pub mod ward;
