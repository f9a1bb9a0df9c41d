//! Primitives shared by the order FTP relay engine and server.
mod secret;
mod shop_domain;

pub mod helpers;

pub use secret::Secret;
pub use shop_domain::{InvalidShopDomain, ShopDomain};
