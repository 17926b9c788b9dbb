use std::fmt;

use serde::{Deserialize, Serialize};

/// Create/update payload as the microservice defines it. No identity.
///
/// `cost_price` is kept as a raw JSON number so integers stay integers when
/// the payload is re-serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Product {
    pub name: String,
    pub cost_price: serde_json::Number,
    pub current_stock: i64,
}

/// Product body accepted by the gateway and forwarded as-is.
///
/// Partial updates and malformed bodies are not rejected here; the upstream
/// owns validation, so anything that isn't a full `Product` rides along as
/// opaque JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductPayload {
    Product(Product),
    Passthrough(serde_json::Value),
}

impl Default for ProductPayload {
    fn default() -> Self {
        ProductPayload::Passthrough(serde_json::Value::Object(Default::default()))
    }
}

impl ProductPayload {
    pub fn name(&self) -> Option<&str> {
        match self {
            ProductPayload::Product(p) => Some(&p.name),
            ProductPayload::Passthrough(v) => v.get("name").and_then(|n| n.as_str()),
        }
    }
}

/// Product as returned by the microservice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub cost_price: serde_json::Number,
    pub current_stock: i64,
}

// ── Stock adjustments ────────────────────────────────────────────────────────

/// Stock quantity as sent by the caller. Non-integer values are forwarded
/// untouched for the upstream to reject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Units(i64),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockDecrease {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub discount: Option<Quantity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockIncrease {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub increase: Option<Quantity>,
}

/// A field that is present is kept, even as `null`; only an absent field is
/// `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Quantity>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Quantity::deserialize(deserializer).map(Some)
}

// ── Path id ──────────────────────────────────────────────────────────────────

/// Path `id` after numeric coercion.
///
/// Text that isn't a finite number becomes `NaN`, which is still forwarded:
/// the upstream decides whether the product exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProductId {
    Int(i64),
    Float(f64),
    NaN,
}

impl ProductId {
    pub fn coerce(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return ProductId::Int(0);
        }
        if let Ok(n) = raw.parse::<i64>() {
            return ProductId::Int(n);
        }
        if raw.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
            return ProductId::NaN;
        }
        match raw.parse::<f64>() {
            Ok(f) if f.is_finite() => {
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    ProductId::Int(f as i64)
                } else {
                    ProductId::Float(f)
                }
            }
            _ => ProductId::NaN,
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Int(n) => write!(f, "{}", n),
            ProductId::Float(x) => write!(f, "{}", x),
            ProductId::NaN => f.write_str("NaN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── ProductId ──────────────────────────────────────────────────────────────

    #[test]
    fn id_plain_integer() {
        assert_eq!(ProductId::coerce("5"), ProductId::Int(5));
        assert_eq!(ProductId::coerce("5").to_string(), "5");
    }

    #[test]
    fn id_integral_float_renders_as_integer() {
        assert_eq!(ProductId::coerce("12.0").to_string(), "12");
        assert_eq!(ProductId::coerce("1e3").to_string(), "1000");
    }

    #[test]
    fn id_fractional_keeps_fraction() {
        assert_eq!(ProductId::coerce("1.5").to_string(), "1.5");
    }

    #[test]
    fn id_non_numeric_is_nan() {
        assert_eq!(ProductId::coerce("abc"), ProductId::NaN);
        assert_eq!(ProductId::coerce("inf").to_string(), "NaN");
        assert_eq!(ProductId::coerce("12abc").to_string(), "NaN");
    }

    #[test]
    fn id_blank_is_zero() {
        assert_eq!(ProductId::coerce("  "), ProductId::Int(0));
    }

    // ── Payloads ───────────────────────────────────────────────────────────────

    #[test]
    fn full_product_body_is_typed() {
        let payload: ProductPayload = serde_json::from_value(json!({
            "name": "Widget",
            "cost_price": 9.5,
            "current_stock": 10,
        }))
        .unwrap();
        assert!(matches!(payload, ProductPayload::Product(_)));
        assert_eq!(payload.name(), Some("Widget"));
    }

    #[test]
    fn partial_product_body_passes_through_unchanged() {
        let body = json!({ "current_stock": "lots", "colour": "red" });
        let payload: ProductPayload = serde_json::from_value(body.clone()).unwrap();
        assert!(matches!(payload, ProductPayload::Passthrough(_)));
        assert_eq!(serde_json::to_value(&payload).unwrap(), body);
    }

    #[test]
    fn integer_cost_price_survives_reserialization() {
        let body = json!({ "name": "Widget", "cost_price": 10, "current_stock": 1 });
        let payload: ProductPayload = serde_json::from_value(body.clone()).unwrap();
        let forwarded = serde_json::to_value(&payload).unwrap();
        assert!(forwarded["cost_price"].is_i64());
        assert_eq!(forwarded, body);
    }

    #[test]
    fn default_payload_is_empty_object() {
        assert_eq!(serde_json::to_value(ProductPayload::default()).unwrap(), json!({}));
    }

    #[test]
    fn stock_body_keeps_only_its_field() {
        let body: StockIncrease =
            serde_json::from_value(json!({ "increase": 3, "note": "restock" })).unwrap();
        assert_eq!(body.increase, Some(Quantity::Units(3)));
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "increase": 3 }));
    }

    #[test]
    fn missing_stock_field_serializes_as_empty_object() {
        let body: StockDecrease = serde_json::from_value(json!({})).unwrap();
        assert_eq!(serde_json::to_string(&body).unwrap(), "{}");
    }

    #[test]
    fn explicit_null_quantity_is_forwarded() {
        let body: StockDecrease = serde_json::from_value(json!({ "discount": null })).unwrap();
        assert_eq!(body.discount, Some(Quantity::Other(serde_json::Value::Null)));
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"discount":null}"#);
    }

    #[test]
    fn non_integer_quantity_is_forwarded() {
        let body: StockDecrease = serde_json::from_value(json!({ "discount": "two" })).unwrap();
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "discount": "two" }));
    }

    #[test]
    fn product_response_rejects_unknown_fields() {
        let parsed = serde_json::from_value::<ProductResponse>(json!({
            "id": 1, "name": "A", "cost_price": 1.0, "current_stock": 2, "sku": "X"
        }));
        assert!(parsed.is_err());
    }
}
