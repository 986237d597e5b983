//! Payment gateway integration.
//!
//! # Data Flow
//! ```text
//! validated order
//!     → mapping.rs (renames, fixed-decimal amounts, phone normalization, ids)
//!     → client.rs (one bearer-auth POST)
//!     → types.rs (response extraction, GatewayError)
//! ```
//!
//! # Security Constraints
//! - The API token only ever appears in the Authorization header
//! - Debug output reports credential presence, never values

pub mod client;
pub mod mapping;
pub mod types;

pub use client::GatewayClient;
pub use types::{Endpoint, GatewayError, GatewayResult, Merchant, PaymentSession};
