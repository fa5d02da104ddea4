//! 客户关系管理服务
//!
//! 提供客户及其地址的 REST API，后端为 PostgreSQL。
//!
//! ## 核心功能
//!
//! - **客户管理**：创建（可内联首个地址）、详情、部分更新、删除（地址级联删除）
//! - **客户列表**：分页、姓名/手机号模糊搜索、按城市/省份/邮编过滤、白名单排序
//! - **地址管理**：为客户新增、列出、部分更新、删除地址
//!
//! ## 模块结构
//!
//! - `dto`: 请求和响应的数据传输对象
//! - `models`: 数据库实体
//! - `query`: 列表查询与部分更新的 SQL 构建
//! - `repository`: 数据访问层
//! - `extract`: 统一错误信封的请求提取器
//! - `error`: 错误类型定义
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由配置
//! - `state`: 应用状态

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod query;
pub mod repository;
pub mod routes;
pub mod state;

// 重新导出核心类型
pub use dto::{
    ApiResponse, CreateAddressRequest, CreateCustomerRequest, ListCustomersParams, PageMeta,
    UpdateAddressRequest, UpdateCustomerRequest,
};
pub use error::{ApiError, FieldError, Result};
pub use models::{Address, Customer, CustomerWithAddresses};
pub use query::{CustomerFilter, CustomerListQuery, FieldChanges, SortDirection, SortField, SortOrder};
pub use repository::{
    AddressRepository, AddressRepositoryTrait, CustomerRepository, CustomerRepositoryTrait,
};
pub use state::AppState;
