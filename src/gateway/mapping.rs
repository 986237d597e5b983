//! Mapping from validated checkout orders to gateway request bodies.
//!
//! Pure functions, no I/O.

use uuid::Uuid;

use crate::checkout::{Amount, CartLine, SaleOrder, SessionOrder, Shipping};
use crate::config::schema::GatewayConfig;
use crate::gateway::types::{
    Address, Customer, HostedFieldsTokenBody, LineItem, Merchant, PaymentSessionBody, SaleBody,
};

const DEFAULT_COUNTRY: &str = "US";
const RETURN_PATH: &str = "/checkout/success";
const CANCEL_PATH: &str = "/checkout/cancel";

/// Format an amount as a fixed two-decimal string.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// Normalize a phone number to `+<digits>` for a US storefront.
///
/// Ten digits get the `+1` prefix, eleven digits starting with `1` keep it,
/// and numbers already written with `+` keep their country code. Anything
/// else is dropped.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();

    if trimmed.starts_with('+') {
        return (8..=15)
            .contains(&digits.len())
            .then(|| format!("+{}", digits));
    }

    match digits.len() {
        10 => Some(format!("+1{}", digits)),
        11 if digits.starts_with('1') => Some(format!("+{}", digits)),
        _ => None,
    }
}

/// Split "First Middle Last" into ("First", "Middle Last").
pub fn split_full_name(full_name: &str) -> (String, String) {
    let trimmed = full_name.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (trimmed.to_string(), String::new()),
    }
}

/// Use the client's order id, or mint one.
pub fn external_id_or_generate(external_id: Option<String>) -> String {
    external_id.unwrap_or_else(|| format!("web-{}", Uuid::new_v4().simple()))
}

pub fn token_body<'a>(config: &'a GatewayConfig, merchant: &Merchant<'_>) -> HostedFieldsTokenBody<'a> {
    HostedFieldsTokenBody {
        terminal: merchant.terminal,
        domain: &config.client_url,
        expiration: config.token_expiration_minutes,
        save_card: "disabled",
        three_ds: false,
    }
}

pub fn session_body(
    config: &GatewayConfig,
    merchant: &Merchant<'_>,
    order: SessionOrder,
) -> PaymentSessionBody {
    PaymentSessionBody {
        dba: merchant.dba_id.to_string(),
        terminal: merchant.terminal,
        amount: amount_string(order.total),
        external_id: external_id_or_generate(order.external_id),
        items: line_items(&order.cart),
        customer: customer(&order.shipping),
        billing_address: address(order.shipping),
        return_url: config.client_link(RETURN_PATH),
        cancel_url: config.client_link(CANCEL_PATH),
    }
}

pub fn sale_body(merchant: &Merchant<'_>, order: SaleOrder) -> SaleBody {
    SaleBody {
        dba: merchant.dba_id.to_string(),
        terminal: merchant.terminal,
        amount: amount_string(order.amount),
        external_id: external_id_or_generate(order.external_id),
        token: order.token,
        items: line_items(&order.cart),
        customer: order.shipping.as_ref().map(customer),
        billing_address: order.shipping.map(address),
        description: order.description,
    }
}

fn amount_string(amount: Amount) -> String {
    format_amount(amount.value())
}

fn line_items(cart: &[CartLine]) -> Vec<LineItem> {
    cart.iter()
        .map(|line| LineItem {
            sku: line.id.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            price: format_amount(line.price),
        })
        .collect()
}

fn customer(shipping: &Shipping) -> Customer {
    let (first_name, last_name) = split_full_name(&shipping.full_name);
    Customer {
        email: shipping.email.clone(),
        first_name,
        last_name,
        phone: shipping.phone.as_deref().and_then(normalize_phone),
    }
}

fn address(shipping: Shipping) -> Address {
    Address {
        line1: shipping.street,
        line2: shipping.street2,
        city: shipping.city,
        state: shipping.state,
        zip: shipping.zip,
        country: shipping
            .country
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
    }
}
