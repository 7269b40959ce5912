use crate::application::order_result::OrderResult;
use pedidos_types::domain::order::{NewOrder, OrderLookup};
use pedidos_types::ports::order_repository::OrderRepository;

pub fn not_found_message(id: i64) -> String {
    format!("No se encontró el pedido con ID {id}")
}

/// The two order operations. Every outcome, including repository failures, comes back as an
/// `OrderResult`; nothing is propagated to the caller as an error.
pub struct OrderService<R: OrderRepository> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn get_order_status(&self, id: i64) -> OrderResult {
        tracing::info!(id, "looking up order status");
        match self.repo.get(id).await {
            Ok(OrderLookup::Found(order)) => {
                tracing::info!(id, status = %order.status, "order found");
                OrderResult::found(order)
            }
            Ok(OrderLookup::NotFound) => {
                tracing::info!(id, "order not found");
                OrderResult::failure(not_found_message(id))
            }
            Err(e) => {
                tracing::error!(id, error = %e, "order lookup failed");
                OrderResult::failure(e.to_string())
            }
        }
    }

    pub async fn create_order(
        &self,
        client_name: String,
        amount: f64,
        description: String,
    ) -> OrderResult {
        tracing::info!(client = %client_name, "creating order");
        let order = match NewOrder::new(client_name, amount, description) {
            Ok(order) => order,
            Err(e) => {
                tracing::error!(error = %e, "rejected order input");
                return OrderResult::failure(e.to_string());
            }
        };
        match self.repo.create(order).await {
            Ok(created) => {
                tracing::info!(id = created.id, "order created");
                OrderResult::created(created)
            }
            Err(e) => {
                tracing::error!(error = %e, "order creation failed");
                OrderResult::failure(e.to_string())
            }
        }
    }
}
