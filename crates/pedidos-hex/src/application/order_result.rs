use pedidos_types::domain::order::Order;
use serde::{Deserialize, Serialize};

pub const CREATED_MESSAGE: &str = "Pedido creado exitosamente";

/// Wire form of an order, as returned inside `pedido`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PedidoPayload {
    pub id: i64,
    #[serde(rename = "cliente")]
    pub client_name: String,
    #[serde(rename = "monto")]
    pub amount: f64,
    #[serde(rename = "estado")]
    pub status: String,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    /// ISO-8601, `null` when the row has no timestamp.
    #[serde(rename = "fecha_creacion")]
    pub created_at: Option<String>,
}

impl From<Order> for PedidoPayload {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            amount: o.amount_f64(),
            created_at: o.created_at_iso(),
            client_name: o.client_name,
            status: o.status,
            description: o.description,
        }
    }
}

/// Result object returned by every order operation. Absent fields are omitted on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderResult {
    pub success: bool,
    #[serde(rename = "mensaje", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "pedido", default, skip_serializing_if = "Option::is_none")]
    pub order: Option<PedidoPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OrderResult {
    pub fn found(order: Order) -> Self {
        Self {
            success: true,
            message: None,
            order: Some(order.into()),
            error: None,
        }
    }

    pub fn created(order: Order) -> Self {
        Self {
            success: true,
            message: Some(CREATED_MESSAGE.to_string()),
            order: Some(order.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            order: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pedidos_types::domain::order::{NewOrder, INITIAL_STATUS};

    fn sample_order() -> Order {
        let new = NewOrder::new("Ana García".into(), 150.50, "2x producto A".into()).unwrap();
        Order {
            id: 42,
            client_name: new.client_name,
            amount: new.amount,
            status: INITIAL_STATUS.into(),
            description: Some(new.description),
            created_at: NaiveDate::from_ymd_opt(2025, 3, 1)
                .and_then(|d| d.and_hms_micro_opt(9, 30, 0, 125_000)),
        }
    }

    #[test]
    fn created_result_uses_wire_names() {
        let json = serde_json::to_value(OrderResult::created(sample_order())).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["mensaje"], CREATED_MESSAGE);
        assert_eq!(json["pedido"]["id"], 42);
        assert_eq!(json["pedido"]["cliente"], "Ana García");
        assert_eq!(json["pedido"]["monto"], 150.5);
        assert_eq!(json["pedido"]["estado"], "pendiente");
        assert_eq!(json["pedido"]["descripcion"], "2x producto A");
        assert_eq!(json["pedido"]["fecha_creacion"], "2025-03-01T09:30:00.125000");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn failure_result_omits_payload() {
        let json = serde_json::to_value(OrderResult::failure("boom")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false, "error": "boom" }));
    }

    #[test]
    fn missing_timestamp_and_description_are_null() {
        let mut order = sample_order();
        order.created_at = None;
        order.description = None;
        let json = serde_json::to_value(OrderResult::found(order)).unwrap();
        assert!(json["pedido"]["fecha_creacion"].is_null());
        assert!(json["pedido"]["descripcion"].is_null());
        assert!(json.get("mensaje").is_none());
    }
}
