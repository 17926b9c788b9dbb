use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

pub const MICROSERVICE_ERROR: &str = "Error from microservice";
pub const PRODUCT_DELETED: &str = "Product deleted successfully";

/// Body of an upstream response after parsing.
///
/// Success bodies that fit the modelled shape are `Typed`; error payloads and
/// anything whose shape drifted are kept `Opaque` so they relay verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UpstreamBody<T> {
    Typed(T),
    Opaque(Value),
}

impl<T> UpstreamBody<T> {
    /// The `detail` field of an opaque error payload, if there is one.
    pub fn detail(&self) -> Option<&Value> {
        match self {
            UpstreamBody::Opaque(v) => v.get("detail"),
            UpstreamBody::Typed(_) => None,
        }
    }
}

/// `{data, status, ok}` produced for every upstream call that got a response.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResult<T> {
    pub data: UpstreamBody<T>,
    pub status: StatusCode,
    pub ok: bool,
}

impl<T: DeserializeOwned> NormalizedResult<T> {
    /// Normalizes a raw upstream response. A body that isn't JSON becomes `{}`.
    pub fn from_parts(status: StatusCode, body: &[u8]) -> Self {
        let ok = status.is_success();
        let value = serde_json::from_slice::<Value>(body)
            .unwrap_or_else(|_| Value::Object(Default::default()));

        let data = if ok {
            match serde_json::from_value::<T>(value.clone()) {
                Ok(typed) => UpstreamBody::Typed(typed),
                Err(_) => UpstreamBody::Opaque(value),
            }
        } else {
            UpstreamBody::Opaque(value)
        };

        Self { data, status, ok }
    }
}

// ── Gateway response shapes ──────────────────────────────────────────────────

/// Error body for a reachable upstream that answered with a non-2xx status.
///
/// Delete answers in its own layout; existing clients depend on it. An absent
/// `detail` is omitted rather than sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorEnvelope {
    /// `{error, detail}`, used by every route but delete.
    Detail {
        error: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<Value>,
    },
    /// `{data, error}`, used by delete.
    Data {
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
        error: &'static str,
    },
}

impl ErrorEnvelope {
    pub fn detail<T>(body: &UpstreamBody<T>) -> Self {
        ErrorEnvelope::Detail {
            error: MICROSERVICE_ERROR,
            detail: body.detail().cloned(),
        }
    }

    pub fn data<T>(body: &UpstreamBody<T>) -> Self {
        ErrorEnvelope::Data {
            data: body.detail().cloned(),
            error: MICROSERVICE_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteConfirmation {
    pub message: &'static str,
}

impl Default for DeleteConfirmation {
    fn default() -> Self {
        Self {
            message: PRODUCT_DELETED,
        }
    }
}

/// `{data: ...}` wrapper used by the stock-increase route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wrapped<T> {
    pub data: T,
}
