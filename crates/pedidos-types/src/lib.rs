//! pedidos-types: domain model, configuration and ports shared by every pedidos crate

pub mod config;
pub mod domain;
pub mod ports;
