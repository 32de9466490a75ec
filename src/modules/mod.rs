pub mod gateways;
pub mod transactions;
