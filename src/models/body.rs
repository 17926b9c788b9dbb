use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Inbound JSON body, forwarded to the upstream without local validation.
///
/// A body declared as JSON that doesn't parse is kept as `Raw` and sent on
/// byte-for-byte. A missing body, or one without a JSON content-type, is the
/// default `T` (an empty object for every payload the gateway forwards).
#[derive(Debug, Clone, PartialEq)]
pub enum JsonBody<T> {
    Parsed(T),
    Raw(Bytes),
}

impl<T> JsonBody<T> {
    pub fn parsed(&self) -> Option<&T> {
        match self {
            JsonBody::Parsed(body) => Some(body),
            JsonBody::Raw(_) => None,
        }
    }
}

impl<T: DeserializeOwned + Default> JsonBody<T> {
    pub fn from_bytes(bytes: Bytes) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return JsonBody::Parsed(T::default());
        }
        match serde_json::from_slice::<Value>(&bytes) {
            // Valid JSON that isn't shaped like `T` contributes nothing, the
            // same as reading an absent field off it.
            Ok(value) => JsonBody::Parsed(serde_json::from_value(value).unwrap_or_default()),
            Err(_) => JsonBody::Raw(bytes),
        }
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = BytesRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json(req.headers()) {
            return Ok(JsonBody::Parsed(T::default()));
        }
        let bytes = Bytes::from_request(req, state).await?;
        Ok(Self::from_bytes(bytes))
    }
}
