//! 仓储 Trait 定义
//!
//! handler 依赖抽象而非具体实现，测试时注入 mock

use async_trait::async_trait;

use crate::dto::{CreateAddressRequest, CreateCustomerRequest};
use crate::error::Result;
use crate::models::{Address, Customer, CustomerWithAddresses};
use crate::query::{CustomerListQuery, FieldChanges};

/// 客户仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepositoryTrait: Send + Sync {
    /// 创建客户（含可选的首个地址），返回回读后的完整客户
    async fn create_customer(&self, input: &CreateCustomerRequest)
    -> Result<CustomerWithAddresses>;
    /// 分页列表，返回当前页数据和过滤后的总数
    async fn list_customers(&self, query: &CustomerListQuery) -> Result<(Vec<Customer>, i64)>;
    async fn get_customer(&self, id: i64) -> Result<Option<CustomerWithAddresses>>;
    async fn update_customer(&self, id: i64, changes: &FieldChanges) -> Result<Option<Customer>>;
    async fn delete_customer(&self, id: i64) -> Result<bool>;
    async fn customer_exists(&self, id: i64) -> Result<bool>;
}

/// 地址仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddressRepositoryTrait: Send + Sync {
    async fn create_address(
        &self,
        customer_id: i64,
        input: &CreateAddressRequest,
    ) -> Result<Address>;
    async fn list_addresses(&self, customer_id: i64) -> Result<Vec<Address>>;
    async fn update_address(&self, id: i64, changes: &FieldChanges) -> Result<Option<Address>>;
    async fn delete_address(&self, id: i64) -> Result<bool>;
}
