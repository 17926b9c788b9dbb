use serde::{Deserialize, Serialize};

/// One inventory movement as recorded by the microservice.
///
/// `created_at` is relayed as the upstream formatted it; the gateway never
/// interprets timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MovementResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: i64,
    pub reason: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_field_round_trips_under_its_wire_name() {
        let wire = json!({
            "id": 7,
            "type": "OUT",
            "quantity": 2,
            "reason": "Sale registered",
            "created_at": "2024-05-01T10:00:00",
        });
        let movement: MovementResponse = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(movement.kind, "OUT");
        assert_eq!(serde_json::to_value(&movement).unwrap(), wire);
    }
}
