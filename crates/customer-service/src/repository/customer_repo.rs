//! 客户仓储
//!
//! 提供客户的增删改查与带过滤条件的分页查询

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};

use super::traits::CustomerRepositoryTrait;
use crate::dto::CreateCustomerRequest;
use crate::error::{ApiError, Result};
use crate::models::{Address, Customer, CustomerWithAddresses};
use crate::query::{CUSTOMER_COLUMNS, CustomerListQuery, FieldChanges};

/// 客户仓储
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 创建客户
    ///
    /// 客户插入、内联地址插入、回读在同一事务中完成，任一步失败整体回滚
    pub async fn create_customer(
        &self,
        input: &CreateCustomerRequest,
    ) -> Result<CustomerWithAddresses> {
        let mut tx = self.pool.begin().await?;

        let customer_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO customers (first_name, last_name, phone_number)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.phone_number)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| ApiError::from_unique_violation(e, &input.phone_number))?;

        if let Some(address) = &input.address {
            sqlx::query(
                r#"
                INSERT INTO addresses (customer_id, address_details, city, state, pin_code)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(customer_id)
            .bind(&address.address_details)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.pin_code)
            .execute(&mut *tx)
            .await?;
        }

        let customer = fetch_customer(&mut *tx, customer_id)
            .await?
            .ok_or_else(|| ApiError::Internal(format!("客户 {} 写入后回读失败", customer_id)))?;
        let addresses = fetch_addresses(&mut *tx, customer_id).await?;

        tx.commit().await?;

        Ok(CustomerWithAddresses::new(customer, addresses))
    }

    /// 分页查询客户
    ///
    /// 计数与取页共用同一组过滤参数，total 不受分页影响
    pub async fn list_customers(&self, query: &CustomerListQuery) -> Result<(Vec<Customer>, i64)> {
        let statement = query.build();

        let count_sql = statement.count_sql();
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for value in statement.binds() {
            count_query = count_query.bind(value);
        }
        let total = count_query.fetch_optional(&self.pool).await?.unwrap_or(0);

        let page_sql = statement.page_sql();
        let mut page_query = sqlx::query_as::<_, Customer>(&page_sql);
        for value in statement.binds() {
            page_query = page_query.bind(value);
        }
        let customers = page_query
            .bind(statement.limit())
            .bind(statement.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((customers, total))
    }

    /// 获取客户及其全部地址
    pub async fn get_customer(&self, id: i64) -> Result<Option<CustomerWithAddresses>> {
        let Some(customer) = fetch_customer(&self.pool, id).await? else {
            return Ok(None);
        };
        let addresses = fetch_addresses(&self.pool, id).await?;

        Ok(Some(CustomerWithAddresses::new(customer, addresses)))
    }

    /// 部分更新客户，客户不存在时返回 None
    pub async fn update_customer(
        &self,
        id: i64,
        changes: &FieldChanges,
    ) -> Result<Option<Customer>> {
        if changes.is_empty() {
            return Err(ApiError::NoFieldsToUpdate);
        }

        let sql = changes.update_sql("customers", CUSTOMER_COLUMNS);
        let mut query = sqlx::query_as::<_, Customer>(&sql);
        for value in changes.values() {
            query = query.bind(value);
        }

        let customer = query
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                ApiError::from_unique_violation(e, changes.get("phone_number").unwrap_or_default())
            })?;

        Ok(customer)
    }

    /// 删除客户，地址由外键级联删除
    pub async fn delete_customer(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn customer_exists(&self, id: i64) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM customers WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}

async fn fetch_customer<'e, E>(executor: E, id: i64) -> Result<Option<Customer>>
where
    E: PgExecutor<'e>,
{
    let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1");
    let customer = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;

    Ok(customer)
}

async fn fetch_addresses<'e, E>(executor: E, customer_id: i64) -> Result<Vec<Address>>
where
    E: PgExecutor<'e>,
{
    let addresses = sqlx::query_as::<_, Address>(
        r#"
        SELECT id, customer_id, address_details, city, state, pin_code
        FROM addresses
        WHERE customer_id = $1
        ORDER BY id ASC
        "#,
    )
    .bind(customer_id)
    .fetch_all(executor)
    .await?;

    Ok(addresses)
}

#[async_trait]
impl CustomerRepositoryTrait for CustomerRepository {
    async fn create_customer(
        &self,
        input: &CreateCustomerRequest,
    ) -> Result<CustomerWithAddresses> {
        self.create_customer(input).await
    }

    async fn list_customers(&self, query: &CustomerListQuery) -> Result<(Vec<Customer>, i64)> {
        self.list_customers(query).await
    }

    async fn get_customer(&self, id: i64) -> Result<Option<CustomerWithAddresses>> {
        self.get_customer(id).await
    }

    async fn update_customer(&self, id: i64, changes: &FieldChanges) -> Result<Option<Customer>> {
        self.update_customer(id, changes).await
    }

    async fn delete_customer(&self, id: i64) -> Result<bool> {
        self.delete_customer(id).await
    }

    async fn customer_exists(&self, id: i64) -> Result<bool> {
        self.customer_exists(id).await
    }
}
