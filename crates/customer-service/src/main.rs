//! 客户关系管理服务
//!
//! 提供客户与地址的 REST API，并托管浏览器单页客户端。

use std::path::PathBuf;

use axum::{http::HeaderValue, middleware, routing::get};
use crm_shared::{
    config::{AppConfig, WebConfig},
    database::Database,
    observability::{self, middleware as obs_middleware},
};
use customer_service::{handlers::health, routes, state::AppState};
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
};
use tracing::{info, warn};

const SERVICE_NAME: &str = "customer-service";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // config/default.toml -> config/{env}.toml -> config/customer-service.toml -> 环境变量
    let config = AppConfig::load(SERVICE_NAME)?;

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    let _guard = observability::init(&obs_config).await?;

    info!(
        environment = %config.environment,
        "Starting {} on {}",
        SERVICE_NAME,
        config.server_addr()
    );

    let db = Database::connect(&config.database).await?;
    db.run_migrations().await?;

    let state = AppState::from_pool(db.pool().clone());
    let cors = build_cors(&config.web, config.is_production());

    // 单页客户端：未知路径回退到 index.html
    let static_dir = PathBuf::from(&config.web.static_dir);
    let spa = ServeDir::new(&static_dir)
        .not_found_service(ServeFile::new(static_dir.join("index.html")));
    info!(static_dir = %static_dir.display(), "Serving web client");

    let api = routes::api_routes().route(
        "/ready",
        get({
            let db_for_ready = db.clone();
            move || readiness_check(db_for_ready.clone())
        }),
    );

    let app = routes::mount(api, state)
        .fallback_service(spa)
        .layer(CompressionLayer::new())
        .layer(cors)
        // 可观测性中间件：请求追踪和指标收集
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id));

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    // 收到 SIGTERM 或 Ctrl+C 后停止接收新连接并等待已有请求处理完毕
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");

    Ok(())
}

/// 按 web.cors_origins 构建 CORS 策略
fn build_cors(web: &WebConfig, is_production: bool) -> CorsLayer {
    if web.allows_any_origin() {
        if is_production {
            warn!("web.cors_origins=\"*\" 在生产环境中不安全，请设置为具体域名");
        }
        info!("CORS allowed_origins: * (all origins)");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    info!("CORS allowed_origins: {}", web.cors_origins);
    let origins: Vec<HeaderValue> = web
        .cors_origin_list()
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// 监听关闭信号
///
/// 收到 Ctrl+C 或 SIGTERM 任一信号后返回，触发 axum 的优雅关闭流程。
/// 信号处理器注册失败时该分支永不完成，只依赖另一路信号。
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "注册 Ctrl+C 处理器失败");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "注册 SIGTERM 处理器失败");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}

/// 就绪探针：检查数据库连接是否可用
async fn readiness_check(db: Database) -> axum::response::Response {
    let database_ok = match db.health_check().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Database readiness check failed");
            false
        }
    };

    health::readiness_response(database_ok)
}
