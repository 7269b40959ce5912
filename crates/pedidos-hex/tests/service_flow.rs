use pedidos_hex::application::order_service::OrderService;
use pedidos_repo::memory::InMemoryRepo;
use std::collections::HashSet;
use std::sync::Arc;

// End-to-end service flow against the in-memory adapter.
#[tokio::test]
async fn create_then_lookup_flow() {
    let svc = OrderService::new(InMemoryRepo::new());

    let created = svc
        .create_order("Eve".into(), 42.75, "3x gadget".into())
        .await;
    assert!(created.success);
    let pedido = created.order.unwrap();

    let fetched = svc.get_order_status(pedido.id).await;
    assert!(fetched.success);
    assert_eq!(fetched.order.unwrap(), pedido);

    let missing = svc.get_order_status(pedido.id + 1).await;
    assert!(!missing.success);
    assert!(!missing.error.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids() {
    let svc = Arc::new(OrderService::new(InMemoryRepo::new()));
    let handles: Vec<_> = (0..20)
        .map(|i| {
            let svc = svc.clone();
            tokio::spawn(async move {
                svc.create_order(format!("client-{i}"), 1.5, String::new())
                    .await
                    .order
                    .unwrap()
                    .id
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        assert!(ids.insert(handle.await.unwrap()));
    }
    assert_eq!(ids.len(), 20);
}
