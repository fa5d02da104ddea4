//! 领域实体模型
//!
//! 与数据库表一一对应的行结构

mod address;
mod customer;

pub use address::Address;
pub use customer::{Customer, CustomerWithAddresses};
