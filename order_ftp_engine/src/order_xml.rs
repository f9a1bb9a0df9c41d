//! Converts an incoming order into the Velocity order-import XML format.
//!
//! The document layout is fixed: an `ns0:Orders` root holding one `Header` and one `Order` block. Every ship-to
//! element is always written, even when the order has no shipping address, so downstream importers see the same
//! shape for every file. Formatting never fails because of the order's content; a missing or unreadable value is
//! written as an empty element, and an unreadable order date is replaced with the current time.
use chrono::{DateTime, NaiveDateTime, Utc};
use log::*;
use ofr_common::ShopDomain;
use quick_xml::{
    events::{BytesDecl, BytesText, Event},
    Writer,
};
use serde::Serialize;
use thiserror::Error;

use crate::order_payload::{OrderPayload, ShippingAddress};

pub const ORDERS_NAMESPACE: &str = "http://www.internationaldatasystems.com/velocity/order";
pub const RECEIVER_ID: &str = "ShopifyFTP";
pub const ORDER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Error)]
#[error("Could not write the order XML document. {0}")]
pub struct FormatError(pub String);

impl From<quick_xml::Error> for FormatError {
    fn from(e: quick_xml::Error) -> Self {
        Self(e.to_string())
    }
}

/// A formatted order, ready to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDocument {
    pub file_name: String,
    pub contents: String,
}

/// Where an [`OrderDocument`] ended up on the remote server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub remote_path: String,
    pub bytes: u64,
}

impl OrderDocument {
    /// Formats the order and names the document `order_<name>_<unix millis>.xml`.
    pub fn for_order(shop: &ShopDomain, order: &OrderPayload, now: DateTime<Utc>) -> Result<Self, FormatError> {
        let contents = format_order_xml(shop, order)?;
        let file_name = order_file_name(order.name(), now);
        Ok(Self { file_name, contents })
    }
}

/// Builds the remote file name for an order. Characters outside `[A-Za-z0-9_-]` are dropped from the order name, so
/// `#1001` becomes `order_1001_<millis>.xml`.
pub fn order_file_name(order_name: &str, now: DateTime<Utc>) -> String {
    let name = order_name.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_').collect::<String>();
    format!("order_{name}_{}.xml", now.timestamp_millis())
}

/// Reformat an order timestamp as `YYYY-MM-DD HH:MM:SS`.
///
/// The wall-clock time of the timestamp's own offset is kept, i.e. `2024-03-05T09:15:00-05:00` becomes
/// `2024-03-05 09:15:00`. Missing or unreadable values fall back to the current UTC time.
pub fn format_order_date(created_at: Option<&str>) -> String {
    match created_at.and_then(parse_order_timestamp) {
        Some(ts) => ts.format(ORDER_DATE_FORMAT).to_string(),
        None => {
            warn!("📦️ Could not read order date {created_at:?}. Using the current time instead.");
            Utc::now().format(ORDER_DATE_FORMAT).to_string()
        },
    }
}

fn parse_order_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.naive_local())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok())
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").ok())
}

/// Render the order as an XML document.
///
/// The only possible error comes from the XML writer itself, which does not fail when writing to memory.
pub fn format_order_xml(shop: &ShopDomain, order: &OrderPayload) -> Result<String, FormatError> {
    let shop = shop.as_str();
    let order_date = format_order_date(order.created_at.as_deref());
    let address = order.shipping_address.clone().unwrap_or_default();
    trace!("📦️ Formatting order {} for {shop}", order.name());

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    writer.create_element("ns0:Orders").with_attribute(("xmlns:ns0", ORDERS_NAMESPACE)).write_inner_content(|w| {
        w.create_element("Header").write_inner_content(|w| {
            text_element(w, "PartnerId", shop)?;
            text_element(w, "SenderId", shop)?;
            text_element(w, "ReceiverId", RECEIVER_ID)
        })?;
        w.create_element("Order").write_inner_content(|w| {
            text_element(w, "CustNbr", shop)?;
            text_element(w, "CustomerPoNbr", order.name())?;
            text_element(w, "OrderDate", &order_date)?;
            ship_to_elements(w, &address)?;
            w.create_element("LineItems").write_inner_content(|w| {
                for item in order.line_items() {
                    w.create_element("LineItem").write_inner_content(|w| {
                        text_element(w, "ItemNbr", item.sku.as_deref().unwrap_or_default())?;
                        text_element(w, "QtyOrdered", &item.quantity.to_string())?;
                        w.create_element("LineItemUDFs").write_empty()?;
                        Ok::<(), quick_xml::Error>(())
                    })?;
                }
                Ok::<(), quick_xml::Error>(())
            })?;
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    String::from_utf8(writer.into_inner()).map_err(|e| FormatError(e.to_string()))
}

fn ship_to_elements<W: std::io::Write>(w: &mut Writer<W>, address: &ShippingAddress) -> quick_xml::Result<()> {
    let fields = [
        ("ShipToName", address.name.as_deref()),
        ("ShipToCompany", address.company.as_deref()),
        ("ShipToAddrLine1", address.address1.as_deref()),
        ("ShipToAddrLine2", address.address2.as_deref()),
        ("ShipToCity", address.city.as_deref()),
        ("ShipToState", address.province()),
        ("ShipToPostalCode", address.zip.as_deref()),
        ("ShipToCountry", address.country()),
    ];
    for (tag, value) in fields {
        text_element(w, tag, value.unwrap_or_default())?;
    }
    Ok(())
}

fn text_element<W: std::io::Write>(w: &mut Writer<W>, tag: &str, value: &str) -> quick_xml::Result<()> {
    w.create_element(tag).write_text_content(BytesText::new(value))?;
    Ok(())
}
