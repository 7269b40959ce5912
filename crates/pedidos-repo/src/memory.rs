use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use pedidos_types::domain::order::{NewOrder, Order, OrderLookup, INITIAL_STATUS};
use pedidos_types::ports::order_repository::{OrderRepository, RepoError};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// In-process stand-in for the `pedidos` table: ids come from a sequence starting at 1.
#[derive(Clone)]
pub struct InMemoryRepo {
    pub map: Arc<DashMap<i64, Order>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepo {
    async fn create(&self, order: NewOrder) -> Result<Order, RepoError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = Order {
            id,
            client_name: order.client_name,
            amount: order.amount,
            status: INITIAL_STATUS.to_string(),
            description: Some(order.description),
            created_at: Some(Utc::now().naive_utc()),
        };
        self.map.insert(id, created.clone());
        Ok(created)
    }

    async fn get(&self, id: i64) -> Result<OrderLookup, RepoError> {
        Ok(self.map.get(&id).map(|r| r.clone()).into())
    }

    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}
