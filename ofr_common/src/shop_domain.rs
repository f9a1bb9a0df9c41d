use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

//--------------------------------------     ShopDomain       ---------------------------------------------------------
/// The merchant's shop identifier, e.g. `my-shop.myshopify.com`. Settings are keyed on this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(try_from = "String", into = "String")]
pub struct ShopDomain(String);

#[derive(Debug, Clone, Error)]
#[error("Invalid shop domain: '{0}'")]
pub struct InvalidShopDomain(pub String);

impl ShopDomain {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for ShopDomain {
    type Err = InvalidShopDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let domain = s.trim().to_ascii_lowercase();
        let valid_chars = domain.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        let bad_edges = [domain.chars().next(), domain.chars().last()].iter().any(|c| matches!(c, Some('.' | '-')));
        if domain.is_empty() || !valid_chars || bad_edges {
            return Err(InvalidShopDomain(s.to_string()));
        }
        Ok(Self(domain))
    }
}

impl TryFrom<String> for ShopDomain {
    type Error = InvalidShopDomain;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShopDomain> for String {
    fn from(value: ShopDomain) -> Self {
        value.0
    }
}

impl Display for ShopDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
