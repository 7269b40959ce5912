pub mod order_result;
pub mod order_service;
