//! 客户实体

use serde::{Deserialize, Serialize};

use super::Address;

/// 客户（customers 表）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

/// 客户及其全部地址
///
/// 序列化时客户字段平铺，地址放在 `addresses` 数组中
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerWithAddresses {
    #[serde(flatten)]
    pub customer: Customer,
    pub addresses: Vec<Address>,
}

impl CustomerWithAddresses {
    pub fn new(customer: Customer, addresses: Vec<Address>) -> Self {
        Self {
            customer,
            addresses,
        }
    }
}
