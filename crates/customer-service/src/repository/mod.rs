//! 数据库仓储层
//!
//! 封装 customers / addresses 两张表的 SQL 操作。
//!
//! - 仓储只负责数据持久化，存在性校验等业务判断由 handler 完成
//! - 动态 SQL 只拼接固定的列名与占位符，所有值均通过绑定参数传入
//! - 定义 trait 接口以支持 mock 测试

mod address_repo;
mod customer_repo;
mod traits;

pub use address_repo::AddressRepository;
pub use customer_repo::CustomerRepository;
pub use traits::*;
