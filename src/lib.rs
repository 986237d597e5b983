//! NRS Pay checkout proxy library.
//!
//! Validates storefront checkout requests and forwards them to the NRS Pay
//! gateway with server-held credentials.

pub mod checkout;
pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
