pub mod account_handler;
pub mod health_handler;
