//! Order FTP Relay Engine
//!
//! This library contains the core logic for relaying Shopify orders to a merchant's FTP server. It knows nothing about
//! HTTP.
//!
//! The library is divided into these sections:
//! 1. The order model ([`order_payload`]) and the XML formatter ([`order_xml`]) that turns an order into the document
//!    the merchant's importer expects.
//! 2. Backend contracts ([`traits`]): where FTP settings live and how documents are uploaded. The SQLite backend
//!    ([`SqliteDatabase`]) and the FTP client ([`FtpClient`]) are the shipped implementations.
//! 3. The public API ([`OrderRelayApi`]), which strings the pieces together.
mod db;
mod relay_api;

pub mod db_types;
pub mod ftp;
pub mod order_payload;
pub mod order_xml;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use db::sqlite::{db_url, SqliteDatabase};
pub use ftp::FtpClient;
pub use relay_api::{OrderRelayApi, RelayError};
