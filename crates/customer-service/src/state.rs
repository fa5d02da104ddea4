//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use sqlx::PgPool;

use crate::repository::{
    AddressRepository, AddressRepositoryTrait, CustomerRepository, CustomerRepositoryTrait,
};

/// Axum 应用共享状态
///
/// 仓储以 trait 对象注入，测试时替换为 mock
#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<dyn CustomerRepositoryTrait>,
    pub addresses: Arc<dyn AddressRepositoryTrait>,
}

impl AppState {
    pub fn new(
        customers: Arc<dyn CustomerRepositoryTrait>,
        addresses: Arc<dyn AddressRepositoryTrait>,
    ) -> Self {
        Self {
            customers,
            addresses,
        }
    }

    /// 基于 PostgreSQL 连接池创建默认仓储
    pub fn from_pool(pool: PgPool) -> Self {
        Self::new(
            Arc::new(CustomerRepository::new(pool.clone())),
            Arc::new(AddressRepository::new(pool)),
        )
    }
}
