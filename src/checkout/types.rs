//! Request shapes posted by the storefront client.
//!
//! Everything is optional at the serde level so that the validator, not the
//! JSON extractor, decides which field is missing and which status to return.

use serde::{Deserialize, Deserializer};

/// `POST /api/nrs/create-token`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenRequest {
    #[serde(deserialize_with = "lenient_amount")]
    pub amount: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub external_id: Option<String>,
}

/// `POST /api/nrs/pay`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleRequest {
    pub hosted_fields_token: Option<String>,
    #[serde(deserialize_with = "lenient_amount")]
    pub amount: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub external_id: Option<String>,
    pub order: Option<OrderDetails>,
}

/// Optional order context attached to a sale.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderDetails {
    pub cart: Option<Vec<CartItem>>,
    pub shipping: Option<ShippingContact>,
    pub description: Option<String>,
}

/// `POST /api/nrs/create-payment`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentSessionRequest {
    pub cart: Option<Vec<CartItem>>,
    pub shipping: Option<ShippingContact>,
    #[serde(deserialize_with = "lenient_amount")]
    pub total: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub external_id: Option<String>,
}

/// One line of the storefront cart.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub price: Option<f64>,
}

/// Shipping contact as entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingContact {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub street: Option<String>,
    pub street2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Number(serde_json::Number),
    Text(String),
}

/// Accept `12.5`, `"12.5"` or null. Text that is not a number becomes NaN so
/// the amount check rejects it as an invalid amount rather than a bad body.
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        None => None,
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => None,
        Some(NumberOrText::Text(s)) => Some(s.trim().parse().unwrap_or(f64::NAN)),
    })
}

/// Accept identifiers sent either as strings or numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<IdValue>::deserialize(deserializer)? {
        None => None,
        Some(IdValue::Number(n)) => Some(n.to_string()),
        Some(IdValue::Text(s)) => Some(s),
    })
}
