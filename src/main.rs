use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod config;
mod error;
mod handlers;
mod models;
mod upstream;

use crate::config::Config;
use crate::upstream::UpstreamClient;

/// Shared application state. Holds no mutable state; the upstream client is a
/// cheap handle onto one pooled `reqwest::Client`.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,inventory_gateway=debug".into()),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let state = AppState {
        upstream: UpstreamClient::new(config.upstream_url.as_str()),
    };

    let upstream = state.upstream.base_url().to_string();
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%upstream, "Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    with_middleware(routes()).with_state(state)
}

fn routes() -> Router<AppState> {
    Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/health", get(handlers::health))

        // ── Products ────────────────────────────────────────────────────────
        .route("/products", get(handlers::products::list_products))
        .route("/product", post(handlers::products::create_product))
        .route(
            "/product/:id",
            put(handlers::products::update_product).delete(handlers::products::delete_product),
        )

        // ── Stock ───────────────────────────────────────────────────────────
        .route(
            "/product/:id/stock-decrease",
            put(handlers::products::decrease_stock),
        )
        .route(
            "/product/:id/stock-increase",
            put(handlers::products::increase_stock),
        )
        .route(
            "/product/:id/movements",
            get(handlers::products::list_movements),
        )
}

fn with_middleware(router: Router<AppState>) -> Router<AppState> {
    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // Outermost: a panic in any route becomes the 502 transport-failure body.
        .layer(CatchPanicLayer::custom(error::handle_panic))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::json;
    use tower::ServiceExt;

    async fn explode() -> &'static str {
        panic!("handler blew up")
    }

    #[tokio::test]
    async fn panicking_route_answers_502() {
        let app = with_middleware(routes().route("/explode", get(explode))).with_state(AppState {
            upstream: UpstreamClient::direct("http://127.0.0.1:9"),
        });

        let response = app
            .oneshot(Request::builder().uri("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Can't communicate with microservice" }));
    }
}
