//! 地址仓储

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::AddressRepositoryTrait;
use crate::dto::CreateAddressRequest;
use crate::error::{ApiError, Result};
use crate::models::Address;
use crate::query::FieldChanges;

const ADDRESS_COLUMNS: &str = "id, customer_id, address_details, city, state, pin_code";

/// 地址仓储
pub struct AddressRepository {
    pool: PgPool,
}

impl AddressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 为客户新增地址
    ///
    /// 存在性检查与插入之间客户被删除时，外键冲突按客户不存在处理
    pub async fn create_address(
        &self,
        customer_id: i64,
        input: &CreateAddressRequest,
    ) -> Result<Address> {
        let address = sqlx::query_as::<_, Address>(
            r#"
            INSERT INTO addresses (customer_id, address_details, city, state, pin_code)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, customer_id, address_details, city, state, pin_code
            "#,
        )
        .bind(customer_id)
        .bind(&input.address_details)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.pin_code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return ApiError::CustomerNotFound(customer_id);
            }
            ApiError::Database(e)
        })?;

        Ok(address)
    }

    /// 列出客户的全部地址，按 ID 升序
    pub async fn list_addresses(&self, customer_id: i64) -> Result<Vec<Address>> {
        let addresses = sqlx::query_as::<_, Address>(
            r#"
            SELECT id, customer_id, address_details, city, state, pin_code
            FROM addresses
            WHERE customer_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(addresses)
    }

    /// 部分更新地址，地址不存在时返回 None
    pub async fn update_address(
        &self,
        id: i64,
        changes: &FieldChanges,
    ) -> Result<Option<Address>> {
        if changes.is_empty() {
            return Err(ApiError::NoFieldsToUpdate);
        }

        let sql = changes.update_sql("addresses", ADDRESS_COLUMNS);
        let mut query = sqlx::query_as::<_, Address>(&sql);
        for value in changes.values() {
            query = query.bind(value);
        }

        let address = query.bind(id).fetch_optional(&self.pool).await?;

        Ok(address)
    }

    pub async fn delete_address(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AddressRepositoryTrait for AddressRepository {
    async fn create_address(
        &self,
        customer_id: i64,
        input: &CreateAddressRequest,
    ) -> Result<Address> {
        self.create_address(customer_id, input).await
    }

    async fn list_addresses(&self, customer_id: i64) -> Result<Vec<Address>> {
        self.list_addresses(customer_id).await
    }

    async fn update_address(&self, id: i64, changes: &FieldChanges) -> Result<Option<Address>> {
        self.update_address(id, changes).await
    }

    async fn delete_address(&self, id: i64) -> Result<bool> {
        self.delete_address(id).await
    }
}
