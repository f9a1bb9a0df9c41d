//! The subset of Shopify's `orders/create` webhook payload that the relay uses.
//!
//! Every field is optional on the wire. Shopify's REST payloads use `snake_case`, but orders that have passed through
//! GraphQL tooling arrive with `provinceCode`/`countryCode`, so both spellings are accepted; the camel-case field wins
//! when both are present.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPayload {
    #[serde(default)]
    pub id: Option<i64>,
    /// The human-readable order name, e.g. `#1001`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub line_items: Option<Vec<LineItem>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingAddress {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default, rename = "provinceCode", skip_serializing_if = "Option::is_none")]
    pub province_code_camel: Option<String>,
    #[serde(default)]
    pub province_code: Option<String>,
    #[serde(default, rename = "countryCode", skip_serializing_if = "Option::is_none")]
    pub country_code_camel: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub quantity: i64,
}

impl OrderPayload {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn line_items(&self) -> &[LineItem] {
        self.line_items.as_deref().unwrap_or_default()
    }
}

impl ShippingAddress {
    pub fn province(&self) -> Option<&str> {
        self.province_code_camel.as_deref().or(self.province_code.as_deref())
    }

    pub fn country(&self) -> Option<&str> {
        self.country_code_camel.as_deref().or(self.country_code.as_deref())
    }
}

impl LineItem {
    pub fn new<S: Into<String>>(sku: S, quantity: i64) -> Self {
        Self { sku: Some(sku.into()), quantity }
    }
}
