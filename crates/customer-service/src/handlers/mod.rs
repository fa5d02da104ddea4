//! HTTP 请求处理器
//!
//! handler 负责存在性校验、错误映射和指标记录，SQL 全部委托给仓储层

pub mod address;
pub mod customer;
pub mod health;
