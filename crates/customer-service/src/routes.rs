//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, put},
};
use serde_json::json;

use crate::{handlers, state::AppState};

/// `/api` 下未匹配的路径返回 JSON 404，而不是落到静态文件服务
async fn api_not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "code": "NOT_FOUND",
            "message": "route not found",
        })),
    )
}

/// 已知路径上的错误方法同样返回 JSON 信封
async fn api_method_not_allowed() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "success": false,
            "code": "METHOD_NOT_ALLOWED",
            "message": "method not allowed",
        })),
    )
}

/// 构建客户管理路由
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/customers",
            get(handlers::customer::list_customers).post(handlers::customer::create_customer),
        )
        .route(
            "/customers/{id}",
            get(handlers::customer::get_customer)
                .put(handlers::customer::update_customer)
                .delete(handlers::customer::delete_customer),
        )
        .route(
            "/customers/{id}/addresses",
            get(handlers::address::list_addresses).post(handlers::address::create_address),
        )
}

/// 构建地址管理路由
fn address_routes() -> Router<AppState> {
    Router::new().route(
        "/addresses/{address_id}",
        put(handlers::address::update_address).delete(handlers::address::delete_address),
    )
}

/// 构建完整的 API 路由（不含前缀）
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .merge(customer_routes())
        .merge(address_routes())
}

/// 把 API 路由挂载到 `/api` 前缀下并注入状态
///
/// main.rs 在挂载前追加就绪探针，之后叠加中间件和静态文件服务
pub fn mount(api: Router<AppState>, state: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            api.method_not_allowed_fallback(api_method_not_allowed)
                .fallback(api_not_found),
        )
        .with_state(state)
}

/// 标准 API 路由
pub fn router(state: AppState) -> Router {
    mount(api_routes(), state)
}
