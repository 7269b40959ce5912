///  To run :
///  cargo r -p pedidos-app --features memory --example client_example
use pedidos_client::{CrearPedidoRequest, PedidosClient};
use pedidos_hex::application::order_service::OrderService;
use pedidos_hex::inbound::http::{HttpServer, HttpServerConfig};
use pedidos_repo::build_repo;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Start server on ephemeral port with in-memory repo.
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}/");

    let repo = build_repo(None).await?;
    let service = OrderService::new(repo);
    let server = HttpServer::new(
        service,
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = PedidosClient::new(&addr)?;
    for tool in client.list_tools().await? {
        println!("tool {}: {}", tool.name, tool.description);
    }

    let created = client
        .crear(&CrearPedidoRequest {
            cliente: "Ana García".into(),
            monto: 150.50,
            descripcion: "2x producto A".into(),
        })
        .await?;
    let pedido = created
        .pedido
        .ok_or_else(|| anyhow::anyhow!("create failed: {:?}", created.error))?;
    println!("Created pedido id={} estado={}", pedido.id, pedido.estado);

    let fetched = client.estado_por_id(pedido.id).await?;
    println!("Fetched: {fetched:?}");

    let missing = client.estado_por_id(999_999).await?;
    println!("Missing: {}", missing.error.unwrap_or_default());

    handle.abort();
    Ok(())
}
