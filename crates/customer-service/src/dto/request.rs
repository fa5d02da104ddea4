//! 请求 DTO 定义
//!
//! 所有 REST API 的请求参数和请求体结构

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::query::{
    CustomerFilter, CustomerListQuery, FieldChanges, SortOrder, normalize_limit, normalize_page,
};

/// 拒绝纯空白字符串（空串由 length 校验负责）
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// 创建地址请求
///
/// 既用于 POST /api/customers/:id/addresses，也作为创建客户时的内联首个地址
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateAddressRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 255, message = "address_details must be 1-255 characters"),
        custom(function = "not_blank")
    )]
    pub address_details: String,
    #[serde(default)]
    #[validate(
        length(min = 1, max = 100, message = "city must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub city: String,
    #[serde(default)]
    #[validate(
        length(min = 1, max = 100, message = "state must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub state: String,
    #[serde(default)]
    #[validate(
        length(min = 1, max = 20, message = "pin_code must be 1-20 characters"),
        custom(function = "not_blank")
    )]
    pub pin_code: String,
}

/// 创建客户请求
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 100, message = "first_name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub first_name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, max = 100, message = "last_name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub last_name: String,
    #[serde(default)]
    #[validate(length(min = 6, max = 20, message = "phone_number must be 6-20 characters"))]
    pub phone_number: String,
    /// 可选的首个地址，与客户在同一事务中创建
    #[validate(nested)]
    pub address: Option<CreateAddressRequest>,
}

/// 更新客户请求（部分更新）
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(
        length(min = 1, max = 100, message = "first_name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub first_name: Option<String>,
    #[validate(
        length(min = 1, max = 100, message = "last_name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub last_name: Option<String>,
    #[validate(length(min = 6, max = 20, message = "phone_number must be 6-20 characters"))]
    pub phone_number: Option<String>,
}

impl UpdateCustomerRequest {
    /// 按固定的可更新字段列表收集变更
    pub fn changes(&self) -> FieldChanges {
        let mut changes = FieldChanges::new();
        changes
            .set("first_name", self.first_name.as_deref())
            .set("last_name", self.last_name.as_deref())
            .set("phone_number", self.phone_number.as_deref());
        changes
    }
}

/// 更新地址请求（部分更新）
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateAddressRequest {
    #[validate(
        length(min = 1, max = 255, message = "address_details must be 1-255 characters"),
        custom(function = "not_blank")
    )]
    pub address_details: Option<String>,
    #[validate(
        length(min = 1, max = 100, message = "city must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub city: Option<String>,
    #[validate(
        length(min = 1, max = 100, message = "state must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub state: Option<String>,
    #[validate(
        length(min = 1, max = 20, message = "pin_code must be 1-20 characters"),
        custom(function = "not_blank")
    )]
    pub pin_code: Option<String>,
}

impl UpdateAddressRequest {
    /// 按固定的可更新字段列表收集变更
    pub fn changes(&self) -> FieldChanges {
        let mut changes = FieldChanges::new();
        changes
            .set("address_details", self.address_details.as_deref())
            .set("city", self.city.as_deref())
            .set("state", self.state.as_deref())
            .set("pin_code", self.pin_code.as_deref());
        changes
    }
}

/// 客户列表查询参数
///
/// 全部按字符串接收，非法数字不报错而是回退默认值
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListCustomersParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pin_code: Option<String>,
    pub sort: Option<String>,
}

impl ListCustomersParams {
    /// 归一化为查询构建器的输入
    pub fn to_query(&self) -> CustomerListQuery {
        CustomerListQuery {
            page: normalize_page(self.page.as_deref()),
            limit: normalize_limit(self.limit.as_deref()),
            filter: CustomerFilter {
                search: CustomerFilter::normalize(self.search.as_deref()),
                city: CustomerFilter::exact(self.city.as_deref()),
                state: CustomerFilter::exact(self.state.as_deref()),
                pin_code: CustomerFilter::exact(self.pin_code.as_deref()),
            },
            sort: SortOrder::parse(self.sort.as_deref()),
        }
    }
}
