use chrono::{NaiveDateTime, Timelike};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Status every order is stored with on creation. Nothing in this system changes it.
pub const INITIAL_STATUS: &str = "pendiente";

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub client_name: String,
    pub amount: Decimal,
    pub status: String,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

impl Order {
    /// Amount as a float, the way it is reported to callers.
    pub fn amount_f64(&self) -> f64 {
        self.amount.to_f64().unwrap_or_default()
    }

    /// ISO-8601 creation time. Microseconds are printed as six digits and omitted when zero.
    pub fn created_at_iso(&self) -> Option<String> {
        self.created_at.map(|ts| {
            if ts.nanosecond() / 1_000 == 0 {
                ts.format("%Y-%m-%dT%H:%M:%S").to_string()
            } else {
                ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
            }
        })
    }
}

/// Insert input. `id`, `status` and `created_at` are never supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub client_name: String,
    pub amount: Decimal,
    pub description: String,
}

impl NewOrder {
    pub fn new(
        client_name: String,
        amount: f64,
        description: String,
    ) -> anyhow::Result<Self> {
        // Decimal::from_f64 keeps the shortest decimal form, so 19.99 stays 19.99.
        let amount = Decimal::from_f64(amount)
            .ok_or_else(|| anyhow::anyhow!("monto inválido: {amount}"))?;
        Ok(Self {
            client_name,
            amount,
            description,
        })
    }
}

/// Outcome of a primary-key lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderLookup {
    Found(Order),
    NotFound,
}

impl OrderLookup {
    pub fn into_option(self) -> Option<Order> {
        match self {
            OrderLookup::Found(order) => Some(order),
            OrderLookup::NotFound => None,
        }
    }
}

impl From<Option<Order>> for OrderLookup {
    fn from(value: Option<Order>) -> Self {
        match value {
            Some(order) => OrderLookup::Found(order),
            None => OrderLookup::NotFound,
        }
    }
}
