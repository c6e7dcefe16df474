//! Server startup: router assembly, binding and graceful shutdown.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use super::{
    config::ServerConfig,
    error::ServerError,
    handler::{get_room_detail, get_rooms, health_check, index, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Build the router for the given state.
///
/// Without `static_dir` the root route answers with a small JSON document.
/// With it, the bundle is served and every unmatched path falls through to
/// its `index.html`.
pub fn build_router(state: Arc<AppState>, config: &ServerConfig) -> Result<Router, ServerError> {
    let origin = HeaderValue::from_str(&config.frontend_url)
        .map_err(|_| ServerError::InvalidOrigin(config.frontend_url.clone()))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_credentials(true);

    let router = Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_rooms))
        .route("/api/rooms/{room_id}", get(get_room_detail));

    let router = match &config.static_dir {
        Some(dir) => {
            let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
            router.fallback_service(spa)
        }
        None => router.route("/", get(index)),
    };

    Ok(router
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// Run the relay server until a shutdown signal arrives.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    config.validate()?;
    let state = Arc::new(AppState::new(config.heartbeat()));
    let app = build_router(state, &config)?;

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    tracing::info!("Server is running at http://{}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);
    tracing::info!("Allowed origin: {}", config.frontend_url);
    match &config.static_dir {
        Some(dir) => tracing::info!("Serving static bundle from {}", dir.display()),
        None => tracing::debug!("No static bundle configured, serving development root"),
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_router_rejects_invalid_origin() {
        // テスト項目: ヘッダーに使えない frontend_url は起動前にエラーになる
        // given (前提条件):
        let config = ServerConfig {
            frontend_url: "http://bad\norigin".to_string(),
            ..ServerConfig::default()
        };
        let state = Arc::new(AppState::new(config.heartbeat()));

        // when (操作):
        let result = build_router(state, &config);

        // then (期待する結果):
        assert!(matches!(result, Err(ServerError::InvalidOrigin(_))));
    }

    #[test]
    fn test_build_router_with_default_config() {
        // テスト項目: デフォルト設定でルーターを構築できる
        // given (前提条件):
        let config = ServerConfig::default();
        let state = Arc::new(AppState::new(config.heartbeat()));

        // when (操作):
        let result = build_router(state, &config);

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
