//! 地址管理 API 处理器

use axum::{Json, extract::State, http::StatusCode};
use tracing::info;

use crate::{
    dto::{ApiResponse, CreateAddressRequest, UpdateAddressRequest},
    error::{ApiError, Result},
    extract::{PathId, ValidatedJson},
    models::Address,
    state::AppState,
};

/// 客户不存在时返回 404
async fn ensure_customer_exists(state: &AppState, customer_id: i64) -> Result<()> {
    if !state.customers.customer_exists(customer_id).await? {
        return Err(ApiError::CustomerNotFound(customer_id));
    }
    Ok(())
}

/// 为客户新增地址
///
/// POST /api/customers/:id/addresses
pub async fn create_address(
    State(state): State<AppState>,
    PathId(customer_id): PathId,
    ValidatedJson(req): ValidatedJson<CreateAddressRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Address>>)> {
    ensure_customer_exists(&state, customer_id).await?;

    let address = state.addresses.create_address(customer_id, &req).await?;

    info!(customer_id, address_id = address.id, "Address created");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(address))))
}

/// 获取客户的地址列表
///
/// GET /api/customers/:id/addresses
pub async fn list_addresses(
    State(state): State<AppState>,
    PathId(customer_id): PathId,
) -> Result<Json<ApiResponse<Vec<Address>>>> {
    ensure_customer_exists(&state, customer_id).await?;

    let addresses = state.addresses.list_addresses(customer_id).await?;

    Ok(Json(ApiResponse::success(addresses)))
}

/// 部分更新地址
///
/// PUT /api/addresses/:address_id
pub async fn update_address(
    State(state): State<AppState>,
    PathId(address_id): PathId,
    ValidatedJson(req): ValidatedJson<UpdateAddressRequest>,
) -> Result<Json<ApiResponse<Address>>> {
    let changes = req.changes();
    if changes.is_empty() {
        return Err(ApiError::NoFieldsToUpdate);
    }

    let address = state
        .addresses
        .update_address(address_id, &changes)
        .await?
        .ok_or(ApiError::AddressNotFound(address_id))?;

    info!(address_id, fields = ?changes.columns(), "Address updated");

    Ok(Json(ApiResponse::success(address)))
}

/// 删除地址
///
/// DELETE /api/addresses/:address_id
pub async fn delete_address(
    State(state): State<AppState>,
    PathId(address_id): PathId,
) -> Result<Json<ApiResponse<()>>> {
    if !state.addresses.delete_address(address_id).await? {
        return Err(ApiError::AddressNotFound(address_id));
    }

    info!(address_id, "Address deleted");

    Ok(Json(ApiResponse::success_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{address, app, send};
    use crate::repository::{MockAddressRepositoryTrait, MockCustomerRepositoryTrait};
    use serde_json::json;

    fn customer_exists(exists: bool) -> MockCustomerRepositoryTrait {
        let mut customers = MockCustomerRepositoryTrait::new();
        customers
            .expect_customer_exists()
            .returning(move |_| Ok(exists));
        customers
    }

    const NEW_ADDRESS: &str =
        r#"{"address_details":"12 MG Road","city":"Pune","state":"MH","pin_code":"411001"}"#;

    #[tokio::test]
    async fn test_create_address_returns_201() {
        let mut addresses = MockAddressRepositoryTrait::new();
        addresses
            .expect_create_address()
            .withf(|customer_id, req| *customer_id == 3 && req.pin_code == "411001")
            .times(1)
            .returning(|customer_id, _| Ok(address(11, customer_id)));

        let (status, body) = send(
            app(customer_exists(true), addresses),
            "POST",
            "/api/customers/3/addresses",
            Some(NEW_ADDRESS),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["id"], 11);
        assert_eq!(body["data"]["customer_id"], 3);
    }

    #[tokio::test]
    async fn test_create_address_customer_missing() {
        let mut addresses = MockAddressRepositoryTrait::new();
        addresses.expect_create_address().never();

        let (status, body) = send(
            app(customer_exists(false), addresses),
            "POST",
            "/api/customers/3/addresses",
            Some(NEW_ADDRESS),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "CUSTOMER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_create_address_validation() {
        let (status, body) = send(
            app(MockCustomerRepositoryTrait::new(), MockAddressRepositoryTrait::new()),
            "POST",
            "/api/customers/3/addresses",
            Some(r#"{"city":"Pune"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_addresses() {
        let mut addresses = MockAddressRepositoryTrait::new();
        addresses
            .expect_list_addresses()
            .returning(|customer_id| Ok(vec![address(1, customer_id), address(2, customer_id)]));

        let (status, body) = send(
            app(customer_exists(true), addresses),
            "GET",
            "/api/customers/8/addresses",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["id"], 1);
        assert_eq!(body["data"][1]["id"], 2);
    }

    #[tokio::test]
    async fn test_list_addresses_customer_missing() {
        let (status, body) = send(
            app(customer_exists(false), MockAddressRepositoryTrait::new()),
            "GET",
            "/api/customers/8/addresses",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "CUSTOMER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_address() {
        let mut addresses = MockAddressRepositoryTrait::new();
        addresses
            .expect_update_address()
            .withf(|id, changes| *id == 11 && changes.columns() == vec!["city"])
            .returning(|id, _| {
                let mut updated = address(id, 3);
                updated.city = "Mumbai".to_string();
                Ok(Some(updated))
            });

        let (status, body) = send(
            app(MockCustomerRepositoryTrait::new(), addresses),
            "PUT",
            "/api/addresses/11",
            Some(r#"{"city":"Mumbai"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["city"], "Mumbai");
    }

    #[tokio::test]
    async fn test_update_address_empty_body() {
        let mut addresses = MockAddressRepositoryTrait::new();
        addresses.expect_update_address().never();

        let (status, body) = send(
            app(MockCustomerRepositoryTrait::new(), addresses),
            "PUT",
            "/api/addresses/11",
            Some(r#"{"customer_id":99}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "NO_FIELDS_TO_UPDATE");
    }

    #[tokio::test]
    async fn test_update_address_not_found() {
        let mut addresses = MockAddressRepositoryTrait::new();
        addresses.expect_update_address().returning(|_, _| Ok(None));

        let (status, body) = send(
            app(MockCustomerRepositoryTrait::new(), addresses),
            "PUT",
            "/api/addresses/11",
            Some(r#"{"city":"Mumbai"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ADDRESS_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete_address() {
        let mut addresses = MockAddressRepositoryTrait::new();
        addresses.expect_delete_address().returning(|_| Ok(true));

        let (status, body) = send(
            app(MockCustomerRepositoryTrait::new(), addresses),
            "DELETE",
            "/api/addresses/11",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));
    }

    #[tokio::test]
    async fn test_delete_address_not_found() {
        let mut addresses = MockAddressRepositoryTrait::new();
        addresses.expect_delete_address().returning(|_| Ok(false));

        let (status, body) = send(
            app(MockCustomerRepositoryTrait::new(), addresses),
            "DELETE",
            "/api/addresses/abc",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let mut addresses = MockAddressRepositoryTrait::new();
        addresses.expect_delete_address().returning(|_| Ok(false));
        let (status, body) = send(
            app(MockCustomerRepositoryTrait::new(), addresses),
            "DELETE",
            "/api/addresses/11",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ADDRESS_NOT_FOUND");
    }
}
