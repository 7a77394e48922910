//! Account Service Library
//!
//! Account creation, login, lookup, listing, deletion and transfer over
//! HTTP, with HS256 session tokens and an access gate that limits each
//! token to the account it was issued for.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Password hashing and session token signing
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `middleware` - Access gate
//! - `models` - Data models
//! - `observability` - Log field hashing and metrics
//! - `repositories` - Account store
//! - `routes` - Router assembly
//! - `services` - Business logic layer

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
