//! Tool catalogue shared by the stdio and HTTP transports.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::application::order_result::OrderResult;
use crate::application::order_service::OrderService;
use crate::errors::AppError;
use pedidos_types::ports::order_repository::OrderRepository;

pub const ESTADO_POR_ID: &str = "pedidos_estado_por_id";
pub const CREAR: &str = "pedidos_crear";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Deserialize)]
struct EstadoPorIdArgs {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct CrearArgs {
    cliente: String,
    monto: f64,
    #[serde(default)]
    descripcion: String,
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: ESTADO_POR_ID.into(),
            description: "Consulta el estado y detalles de un pedido específico por su ID".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "description": "ID del pedido a consultar" }
                },
                "required": ["id"]
            }),
        },
        ToolDefinition {
            name: CREAR.into(),
            description: "Crea un nuevo pedido en el sistema".into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "cliente": {
                        "type": "string",
                        "description": "Nombre del cliente que realiza el pedido"
                    },
                    "monto": {
                        "type": "number",
                        "description": "Monto total del pedido en la moneda local"
                    },
                    "descripcion": {
                        "type": "string",
                        "description": "Descripción opcional del pedido (productos, notas, etc)",
                        "default": ""
                    }
                },
                "required": ["cliente", "monto"]
            }),
        },
    ]
}

fn parse_args<T: for<'de> Deserialize<'de>>(arguments: Value) -> Result<T, AppError> {
    // A call without arguments arrives as null; treat it like an empty object.
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| AppError::InvalidArguments(e.to_string()))
}

/// Routes a tool call to the matching order operation.
pub async fn call_tool<R: OrderRepository>(
    service: &OrderService<R>,
    name: &str,
    arguments: Value,
) -> Result<OrderResult, AppError> {
    tracing::info!(tool = name, arguments = %arguments, "tool call");
    match name {
        ESTADO_POR_ID => {
            let args: EstadoPorIdArgs = parse_args(arguments)?;
            Ok(service.get_order_status(args.id).await)
        }
        CREAR => {
            let args: CrearArgs = parse_args(arguments)?;
            Ok(service
                .create_order(args.cliente, args.monto, args.descripcion)
                .await)
        }
        other => Err(AppError::UnknownTool(other.to_string())),
    }
}
