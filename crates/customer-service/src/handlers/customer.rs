//! 客户管理 API 处理器
//!
//! 实现客户的 CRUD 与列表查询

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use crm_shared::observability::metrics;
use tracing::info;

use crate::{
    dto::{ApiResponse, CreateCustomerRequest, ListCustomersParams, PageMeta, UpdateCustomerRequest},
    error::{ApiError, Result},
    extract::{PathId, ValidatedJson},
    models::{Customer, CustomerWithAddresses},
    state::AppState,
};

fn record_conflict(operation: &'static str) -> impl FnOnce(&ApiError) {
    move |e: &ApiError| {
        if matches!(e, ApiError::PhoneNumberConflict(_)) {
            metrics::record_phone_number_conflict(operation);
        }
    }
}

/// 创建客户
///
/// POST /api/customers
pub async fn create_customer(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CustomerWithAddresses>>)> {
    let created = state
        .customers
        .create_customer(&req)
        .await
        .inspect_err(record_conflict("create"))?;

    metrics::record_customer_created(req.address.is_some());
    info!(
        customer_id = created.customer.id,
        addresses = created.addresses.len(),
        "Customer created"
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::success(created))))
}

/// 获取客户列表
///
/// GET /api/customers
///
/// 非法的分页参数回退为默认值，不返回错误
pub async fn list_customers(
    State(state): State<AppState>,
    params: std::result::Result<Query<ListCustomersParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Customer>>>> {
    let Query(params) = params.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let query = params.to_query();

    let (customers, total) = state.customers.list_customers(&query).await?;

    metrics::record_customer_list_query(query.filter.is_active());

    let meta = PageMeta {
        page: query.page,
        limit: query.limit,
        total,
    };
    Ok(Json(ApiResponse::paged(customers, meta)))
}

/// 获取客户详情（含地址）
///
/// GET /api/customers/:id
pub async fn get_customer(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<ApiResponse<CustomerWithAddresses>>> {
    let customer = state
        .customers
        .get_customer(id)
        .await?
        .ok_or(ApiError::CustomerNotFound(id))?;

    Ok(Json(ApiResponse::success(customer)))
}

/// 部分更新客户
///
/// PUT /api/customers/:id
pub async fn update_customer(
    State(state): State<AppState>,
    PathId(id): PathId,
    ValidatedJson(req): ValidatedJson<UpdateCustomerRequest>,
) -> Result<Json<ApiResponse<Customer>>> {
    let changes = req.changes();
    if changes.is_empty() {
        return Err(ApiError::NoFieldsToUpdate);
    }

    let customer = state
        .customers
        .update_customer(id, &changes)
        .await
        .inspect_err(record_conflict("update"))?
        .ok_or(ApiError::CustomerNotFound(id))?;

    info!(customer_id = id, fields = ?changes.columns(), "Customer updated");

    Ok(Json(ApiResponse::success(customer)))
}

/// 删除客户（地址级联删除）
///
/// DELETE /api/customers/:id
pub async fn delete_customer(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<ApiResponse<()>>> {
    if !state.customers.delete_customer(id).await? {
        return Err(ApiError::CustomerNotFound(id));
    }

    metrics::record_customer_deleted();
    info!(customer_id = id, "Customer deleted");

    Ok(Json(ApiResponse::success_empty()))
}
