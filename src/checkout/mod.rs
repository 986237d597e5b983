//! Checkout request model and validation.
//!
//! # Data Flow
//! ```text
//! JSON body
//!     → types.rs (lenient deserialization, everything optional)
//!     → validation.rs (ordered checks, fail fast)
//!     → TokenOrder / SaleOrder / SessionOrder
//!     → gateway mapping
//! ```

pub mod types;
pub mod validation;

pub use types::{
    CartItem, OrderDetails, PaymentSessionRequest, SaleRequest, ShippingContact, TokenRequest,
};
pub use validation::{
    validate_cart, validate_sale_request, validate_session_request, validate_shipping,
    validate_token_request, Amount, CartLine, CheckoutError, SaleOrder, SessionOrder, Shipping,
    TokenOrder,
};
