//! Request validation.
//!
//! Checks run in a fixed order: amount, then token (sale), then cart and its
//! lines, then shipping. Each check fails fast; nothing here talks to the gateway.

use thiserror::Error;

use crate::checkout::types::{
    CartItem, PaymentSessionRequest, SaleRequest, ShippingContact, TokenRequest,
};

/// Client input problems. Always reported as 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Invalid payment amount.")]
    InvalidAmount,

    #[error("Missing hosted fields token.")]
    MissingToken,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid price for cart item {0}")]
    InvalidItemPrice(usize),

    #[error("Invalid quantity for cart item {0}")]
    InvalidItemQuantity(usize),

    #[error("Shipping information is required")]
    MissingShipping,

    #[error("Missing shipping fields: {}", .0.join(", "))]
    IncompleteShipping(Vec<&'static str>),
}

/// A strictly positive, finite amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount(f64);

impl Amount {
    pub fn new(value: Option<f64>) -> Result<Self, CheckoutError> {
        match value {
            Some(v) if v.is_finite() && v > 0.0 => Ok(Self(v)),
            _ => Err(CheckoutError::InvalidAmount),
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Cart line with a usable price and a whole, positive quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub id: Option<String>,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

/// Shipping contact with every required field present.
#[derive(Debug, Clone, PartialEq)]
pub struct Shipping {
    pub email: String,
    pub full_name: String,
    pub street: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: Option<String>,
    pub phone: Option<String>,
}

/// Validated hosted fields token request.
#[derive(Debug, Clone)]
pub struct TokenOrder {
    pub amount: Amount,
    pub external_id: Option<String>,
}

/// Validated direct sale.
#[derive(Debug, Clone)]
pub struct SaleOrder {
    pub token: String,
    pub amount: Amount,
    pub external_id: Option<String>,
    pub cart: Vec<CartLine>,
    pub shipping: Option<Shipping>,
    pub description: Option<String>,
}

/// Validated hosted payment session.
#[derive(Debug, Clone)]
pub struct SessionOrder {
    pub total: Amount,
    pub external_id: Option<String>,
    pub cart: Vec<CartLine>,
    pub shipping: Shipping,
}

pub fn validate_token_request(request: TokenRequest) -> Result<TokenOrder, CheckoutError> {
    Ok(TokenOrder {
        amount: Amount::new(request.amount)?,
        external_id: non_blank(request.external_id),
    })
}

pub fn validate_sale_request(request: SaleRequest) -> Result<SaleOrder, CheckoutError> {
    let amount = Amount::new(request.amount)?;
    let token = non_blank(request.hosted_fields_token).ok_or(CheckoutError::MissingToken)?;

    let order = request.order.unwrap_or_default();
    let cart = validate_cart(order.cart.unwrap_or_default())?;
    // Shipping on a sale is optional, but if sent it has to be complete.
    let shipping = order.shipping.map(validate_shipping).transpose()?;

    Ok(SaleOrder {
        token,
        amount,
        external_id: non_blank(request.external_id),
        cart,
        shipping,
        description: non_blank(order.description),
    })
}

pub fn validate_session_request(
    request: PaymentSessionRequest,
) -> Result<SessionOrder, CheckoutError> {
    let total = Amount::new(request.total)?;

    let cart = match request.cart {
        Some(items) if !items.is_empty() => validate_cart(items)?,
        _ => return Err(CheckoutError::EmptyCart),
    };

    let shipping = request
        .shipping
        .ok_or(CheckoutError::MissingShipping)
        .and_then(validate_shipping)?;

    Ok(SessionOrder {
        total,
        external_id: non_blank(request.external_id),
        cart,
        shipping,
    })
}

/// Check every line's price and quantity. Positions in errors are 1-based.
///
/// A missing quantity means one. Prices may be zero but not negative.
pub fn validate_cart(items: Vec<CartItem>) -> Result<Vec<CartLine>, CheckoutError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let position = index + 1;
            let price = match item.price {
                Some(p) if p.is_finite() && p >= 0.0 => p,
                _ => return Err(CheckoutError::InvalidItemPrice(position)),
            };
            let quantity = match item.quantity {
                None => 1,
                Some(q) if q >= 1.0 && q.fract() == 0.0 && q <= f64::from(u32::MAX) => q as u32,
                Some(_) => return Err(CheckoutError::InvalidItemQuantity(position)),
            };
            Ok(CartLine {
                id: item.id,
                name: item.name,
                quantity,
                price,
            })
        })
        .collect()
}

/// Require email, fullName, street, city, state and zip.
pub fn validate_shipping(contact: ShippingContact) -> Result<Shipping, CheckoutError> {
    let mut missing = Vec::new();
    let mut take = |value: Option<String>, name: &'static str| {
        let value = non_blank(value);
        if value.is_none() {
            missing.push(name);
        }
        value.unwrap_or_default()
    };

    let email = take(contact.email, "email");
    let full_name = take(contact.full_name, "fullName");
    let street = take(contact.street, "street");
    let city = take(contact.city, "city");
    let state = take(contact.state, "state");
    let zip = take(contact.zip, "zip");

    if !missing.is_empty() {
        return Err(CheckoutError::IncompleteShipping(missing));
    }

    Ok(Shipping {
        email,
        full_name,
        street,
        street2: non_blank(contact.street2),
        city,
        state,
        zip,
        country: non_blank(contact.country),
        phone: non_blank(contact.phone),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
