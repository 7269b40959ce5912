//! pedidos-hex: order tools core (service + tool catalogue) and its inbound transports

pub mod config;
pub mod errors;

pub mod application;

pub use pedidos_types::{domain, ports};

pub mod inbound; // tool catalogue, stdio JSON-RPC loop, HTTP surface
