use std::time::Duration;

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ESTADO_POR_ID: &str = "pedidos_estado_por_id";
pub const CREAR: &str = "pedidos_crear";

#[derive(Clone)]
pub struct PedidosClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

/// HTTP client for the `/tools` endpoints of the pedidos server.
#[derive(Clone)]
pub struct PedidosClient {
    base: Url,
    client: reqwest::Client,
}

impl PedidosClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<PedidosClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(PedidosClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    pub async fn list_tools(&self) -> anyhow::Result<Vec<ToolInfo>> {
        let res = self
            .client
            .get(self.url("tools")?)
            .send()
            .await?
            .error_for_status()?;
        let listed: ToolList = res.json().await?;
        Ok(listed.tools)
    }

    /// Invokes a tool by name. HTTP errors (unknown tool, bad arguments) surface as `Err`;
    /// order-level failures come back inside the response with `success == false`.
    pub async fn call(&self, tool: &str, arguments: &Value) -> anyhow::Result<PedidoResponse> {
        tracing::debug!(tool, "calling tool");
        let res = self
            .client
            .post(self.url(&format!("tools/{tool}"))?)
            .json(arguments)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    pub async fn estado_por_id(&self, id: i64) -> anyhow::Result<PedidoResponse> {
        self.call(ESTADO_POR_ID, &serde_json::json!({ "id": id }))
            .await
    }

    pub async fn crear(&self, req: &CrearPedidoRequest) -> anyhow::Result<PedidoResponse> {
        let arguments = serde_json::to_value(req)?;
        self.call(CREAR, &arguments).await
    }
}

impl PedidosClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<PedidosClient> {
        if let Some(client) = self.client {
            return Ok(PedidosClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(PedidosClient {
            base: self.base,
            client,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CrearPedidoRequest {
    pub cliente: String,
    pub monto: f64,
    #[serde(default)]
    pub descripcion: String,
}

#[derive(Deserialize)]
struct ToolList {
    tools: Vec<ToolInfo>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Pedido {
    pub id: i64,
    pub cliente: String,
    pub monto: f64,
    pub estado: String,
    pub descripcion: Option<String>,
    pub fecha_creacion: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PedidoResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pedido: Option<Pedido>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn sample_pedido() -> Pedido {
        Pedido {
            id: 7,
            cliente: "Ana García".into(),
            monto: 150.5,
            estado: "pendiente".into(),
            descripcion: Some("2x producto A".into()),
            fecha_creacion: Some("2025-01-15T10:30:00".into()),
        }
    }

    #[tokio::test]
    async fn crear_and_estado_por_id() {
        let server = MockServer::start();
        let pedido = sample_pedido();
        let req = CrearPedidoRequest {
            cliente: pedido.cliente.clone(),
            monto: pedido.monto,
            descripcion: "2x producto A".into(),
        };

        let create_mock = server.mock(|when, then| {
            when.method(POST).path("/tools/pedidos_crear").json_body_obj(&req);
            then.status(200).json_body_obj(&PedidoResponse {
                success: true,
                mensaje: Some("Pedido creado exitosamente".into()),
                pedido: Some(pedido.clone()),
                error: None,
            });
        });

        let get_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/tools/pedidos_estado_por_id")
                .json_body(serde_json::json!({ "id": 7 }));
            then.status(200).json_body_obj(&PedidoResponse {
                success: true,
                mensaje: None,
                pedido: Some(pedido.clone()),
                error: None,
            });
        });

        let client = PedidosClient::new(&server.base_url()).unwrap();
        let created = client.crear(&req).await.unwrap();
        assert!(created.success);
        assert_eq!(created.mensaje.as_deref(), Some("Pedido creado exitosamente"));

        let fetched = client.estado_por_id(7).await.unwrap();
        assert_eq!(fetched.pedido.unwrap(), pedido);

        create_mock.assert();
        get_mock.assert();
    }

    #[tokio::test]
    async fn not_found_is_a_response_not_an_error() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/tools/pedidos_estado_por_id");
            then.status(200).json_body(serde_json::json!({
                "success": false,
                "error": "No se encontró el pedido con ID 999999"
            }));
        });

        let client = PedidosClient::new(&server.base_url()).unwrap();
        let res = client.estado_por_id(999_999).await.unwrap();
        assert!(!res.success);
        assert!(res.pedido.is_none());
        assert_eq!(
            res.error.as_deref(),
            Some("No se encontró el pedido con ID 999999")
        );
        mock.assert();
    }

    #[tokio::test]
    async fn list_tools_and_http_errors() {
        let server = MockServer::start();
        let list_mock = server.mock(|when, then| {
            when.method(GET).path("/tools");
            then.status(200).json_body(serde_json::json!({ "tools": [
                { "name": ESTADO_POR_ID, "description": "estado", "inputSchema": { "type": "object" } },
                { "name": CREAR, "description": "crear", "inputSchema": { "type": "object" } }
            ] }));
        });
        let unknown_mock = server.mock(|when, then| {
            when.method(POST).path("/tools/ventas_por_dia");
            then.status(404)
                .json_body(serde_json::json!({ "error": "Tool desconocida: ventas_por_dia" }));
        });

        let client = PedidosClient::builder(&server.base_url())
            .unwrap()
            .with_timeout(Duration::from_secs(5))
            .with_header("x-client", "pedidos-test")
            .unwrap()
            .build()
            .unwrap();

        let tools = client.list_tools().await.unwrap();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[1].name, CREAR);

        let err = client
            .call("ventas_por_dia", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<reqwest::Error>().and_then(|e| e.status()),
            Some(reqwest::StatusCode::NOT_FOUND)
        );

        list_mock.assert();
        unknown_mock.assert();
    }
}
