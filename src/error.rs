use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

pub const TRANSPORT_FAILURE: &str = "Can't communicate with microservice";

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The upstream could not be reached, or the exchange broke mid-flight.
    #[error("upstream transport failure: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// Body returned whenever the gateway cannot talk to the microservice.
#[derive(Debug, Serialize)]
pub struct TransportFailure {
    pub error: &'static str,
}

impl TransportFailure {
    pub fn response() -> Response {
        (
            StatusCode::BAD_GATEWAY,
            Json(TransportFailure {
                error: TRANSPORT_FAILURE,
            }),
        )
            .into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Upstream(e) => {
                error!(error = %e, url = ?e.url().map(|u| u.as_str()), "Upstream unreachable");
            }
        }
        TransportFailure::response()
    }
}

/// Last-resort handler for panics escaping a route, installed as the
/// outermost layer so it covers every route.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    error!(detail, "Handler panicked");
    TransportFailure::response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn transport_failure_is_502_with_fixed_body() {
        let response = TransportFailure::response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Can't communicate with microservice" })
        );
    }

    #[tokio::test]
    async fn panic_handler_uses_transport_failure_body() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body_json(response).await["error"],
            "Can't communicate with microservice"
        );
    }
}
