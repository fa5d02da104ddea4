//! 健康检查处理器

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::dto::ApiResponse;

/// 存活探针
///
/// GET /api/health
pub async fn health() -> Json<ApiResponse<()>> {
    Json(ApiResponse::with_message("OK"))
}

/// 就绪探针响应
///
/// 数据库不可用时返回 503，负载均衡据此摘除实例
pub fn readiness_response(database_ok: bool) -> Response {
    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = json!({
        "success": database_ok,
        "message": if database_ok { "ready" } else { "degraded" },
        "checks": {
            "database": if database_ok { "ok" } else { "fail" }
        }
    });

    (status, Json(body)).into_response()
}
