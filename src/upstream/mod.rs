use reqwest::{header::CONTENT_TYPE, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::AppResult;
use crate::models::*;

/// Handle to the inventory microservice. Cheap to clone; the inner
/// `reqwest::Client` shares one connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Client that ignores proxy settings from the environment, for tests
    /// talking to loopback mocks.
    #[cfg(test)]
    pub fn direct(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("reqwest client");
        Self::with_client(http, base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }
}

/// Sends one request and normalizes whatever comes back. Only transport
/// failures escape as errors; a bad body never does.
async fn exchange<T: DeserializeOwned>(
    builder: RequestBuilder,
    method: &Method,
    path: &str,
) -> AppResult<NormalizedResult<T>> {
    let response = builder.send().await?;
    let status = response.status();
    let body = response.bytes().await?;

    debug!(%method, path, status = status.as_u16(), bytes = body.len(), "Upstream responded");

    Ok(NormalizedResult::from_parts(status, &body))
}

async fn call<T: DeserializeOwned>(
    client: &UpstreamClient,
    method: Method,
    path: &str,
) -> AppResult<NormalizedResult<T>> {
    let builder = client.request(method.clone(), path);
    exchange(builder, &method, path).await
}

/// Like `call`, with a JSON body. Raw bodies go out byte-for-byte under the
/// same content-type.
async fn call_with_body<T: DeserializeOwned, B: Serialize>(
    client: &UpstreamClient,
    method: Method,
    path: &str,
    body: &JsonBody<B>,
) -> AppResult<NormalizedResult<T>> {
    let builder = client.request(method.clone(), path);
    let builder = match body {
        JsonBody::Parsed(body) => builder.json(body),
        JsonBody::Raw(raw) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(raw.clone()),
    };
    exchange(builder, &method, path).await
}

// ── Products ──────────────────────────────────────────────────────────────────

pub async fn list_products(client: &UpstreamClient) -> AppResult<NormalizedResult<Vec<ProductResponse>>> {
    call(client, Method::GET, "/products").await
}

pub async fn create_product(
    client: &UpstreamClient,
    payload: &JsonBody<ProductPayload>,
) -> AppResult<NormalizedResult<ProductResponse>> {
    call_with_body(client, Method::POST, "/product", payload).await
}

pub async fn update_product(
    client: &UpstreamClient,
    id: ProductId,
    payload: &JsonBody<ProductPayload>,
) -> AppResult<NormalizedResult<ProductResponse>> {
    call_with_body(client, Method::PUT, &format!("/product/{}", id), payload).await
}

/// The payload is echoed in the DELETE body; the microservice ignores it.
pub async fn delete_product(
    client: &UpstreamClient,
    id: ProductId,
    payload: &JsonBody<ProductPayload>,
) -> AppResult<NormalizedResult<Value>> {
    call_with_body(client, Method::DELETE, &format!("/product/{}", id), payload).await
}

// ── Stock ─────────────────────────────────────────────────────────────────────

pub async fn decrease_stock(
    client: &UpstreamClient,
    id: ProductId,
    body: &JsonBody<StockDecrease>,
) -> AppResult<NormalizedResult<ProductResponse>> {
    let path = format!("/product/{}/stock-decrease", id);
    call_with_body(client, Method::PUT, &path, body).await
}

pub async fn increase_stock(
    client: &UpstreamClient,
    id: ProductId,
    body: &JsonBody<StockIncrease>,
) -> AppResult<NormalizedResult<ProductResponse>> {
    let path = format!("/product/{}/stock-increase", id);
    call_with_body(client, Method::PUT, &path, body).await
}

pub async fn list_movements(
    client: &UpstreamClient,
    id: ProductId,
) -> AppResult<NormalizedResult<Vec<MovementResponse>>> {
    call(client, Method::GET, &format!("/product/{}/movements", id)).await
}
