use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    serve, Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::order_result::OrderResult;
use crate::application::order_service::OrderService;
use crate::errors::AppError;
use crate::inbound::tools::{call_tool, tool_definitions, ToolDefinition};
use pedidos_types::ports::order_repository::OrderRepository;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

#[derive(Clone)]
pub struct HttpServer<R>
where
    R: OrderRepository,
{
    pub service: Arc<OrderService<R>>,
    pub config: HttpServerConfig,
}

impl<R> HttpServer<R>
where
    R: OrderRepository + Send + Sync + 'static,
{
    pub async fn new(service: OrderService<R>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    pub fn router(&self) -> Router {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        Router::new()
            .route("/health", get(health))
            .route("/tools", get(list_tools))
            .route("/tools/{name}", post(invoke_tool::<R>))
            .layer(trace_layer)
            .with_state(self.service.clone())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();
        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

async fn health() -> (axum::http::StatusCode, Json<Value>) {
    (
        axum::http::StatusCode::OK,
        Json(serde_json::json!({ "status": "ok" })),
    )
}

/// Same envelope as `tools/list` on stdio.
#[derive(Serialize)]
struct ToolList {
    tools: Vec<ToolDefinition>,
}

async fn list_tools() -> Json<ToolList> {
    Json(ToolList {
        tools: tool_definitions(),
    })
}

async fn invoke_tool<R>(
    State(service): State<Arc<OrderService<R>>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<OrderResult>, AppError>
where
    R: OrderRepository + Send + Sync + 'static,
{
    let arguments = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::InvalidArguments(e.to_string()))?
    };
    let result = call_tool(service.as_ref(), &name, arguments).await?;
    Ok(Json(result))
}
