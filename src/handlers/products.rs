use axum::{
    extract::{Path, State},
    response::Response,
};
use tracing::{info, warn};

use crate::{
    error::AppResult,
    handlers::relay,
    models::{
        DeleteConfirmation, ErrorEnvelope, JsonBody, NormalizedResult, ProductId, ProductPayload,
        StockDecrease, StockIncrease, UpstreamBody, Wrapped,
    },
    upstream, AppState,
};

/// Relays a non-2xx upstream answer in the `{error, detail}` layout.
fn reject<T>(route: &'static str, result: &NormalizedResult<T>) -> Response {
    warn!(route, status = result.status.as_u16(), "Microservice returned an error");
    relay(result.status, ErrorEnvelope::detail(&result.data))
}

fn count<T>(body: &UpstreamBody<Vec<T>>) -> Option<usize> {
    match body {
        UpstreamBody::Typed(items) => Some(items.len()),
        UpstreamBody::Opaque(_) => None,
    }
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(State(state): State<AppState>) -> AppResult<Response> {
    let result = upstream::list_products(&state.upstream).await?;
    if !result.ok {
        return Ok(reject("list_products", &result));
    }

    info!(count = ?count(&result.data), "Listed products");
    Ok(relay(result.status, result.data))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    payload: JsonBody<ProductPayload>,
) -> AppResult<Response> {
    let result = upstream::create_product(&state.upstream, &payload).await?;
    if !result.ok {
        return Ok(reject("create_product", &result));
    }

    info!(name = ?payload.parsed().and_then(|p| p.name()), "Created product");
    Ok(relay(result.status, result.data))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: JsonBody<ProductPayload>,
) -> AppResult<Response> {
    let id = ProductId::coerce(&id);
    let result = upstream::update_product(&state.upstream, id, &payload).await?;
    if !result.ok {
        return Ok(reject("update_product", &result));
    }

    info!(id = %id, "Updated product");
    Ok(relay(result.status, result.data))
}

// ── Delete ────────────────────────────────────────────────────────────────────

/// Success always answers with a fixed confirmation, and errors use the
/// `{data, error}` layout; both differ from the other routes.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: JsonBody<ProductPayload>,
) -> AppResult<Response> {
    let id = ProductId::coerce(&id);
    let result = upstream::delete_product(&state.upstream, id, &payload).await?;
    if !result.ok {
        warn!(route = "delete_product", id = %id, status = result.status.as_u16(), "Microservice returned an error");
        return Ok(relay(result.status, ErrorEnvelope::data(&result.data)));
    }

    info!(id = %id, "Deleted product");
    Ok(relay(result.status, DeleteConfirmation::default()))
}

// ── Stock ─────────────────────────────────────────────────────────────────────

pub async fn decrease_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody<StockDecrease>,
) -> AppResult<Response> {
    let id = ProductId::coerce(&id);
    let result = upstream::decrease_stock(&state.upstream, id, &body).await?;
    if !result.ok {
        return Ok(reject("decrease_stock", &result));
    }

    info!(id = %id, discount = ?body.parsed().and_then(|b| b.discount.as_ref()), "Decreased stock");
    Ok(relay(result.status, result.data))
}

/// Success wraps the upstream body as `{data: ...}`.
pub async fn increase_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody<StockIncrease>,
) -> AppResult<Response> {
    let id = ProductId::coerce(&id);
    let result = upstream::increase_stock(&state.upstream, id, &body).await?;
    if !result.ok {
        return Ok(reject("increase_stock", &result));
    }

    info!(id = %id, increase = ?body.parsed().and_then(|b| b.increase.as_ref()), "Increased stock");
    Ok(relay(result.status, Wrapped { data: result.data }))
}

// ── Movements ─────────────────────────────────────────────────────────────────

pub async fn list_movements(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = ProductId::coerce(&id);
    let result = upstream::list_movements(&state.upstream, id).await?;
    if !result.ok {
        return Ok(reject("list_movements", &result));
    }

    info!(id = %id, count = ?count(&result.data), "Listed movements");
    Ok(relay(result.status, result.data))
}
