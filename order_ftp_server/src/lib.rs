//! # Order FTP Relay server
//! This crate hosts the HTTP side of the order relay. It is responsible for:
//! * Listening for `orders/create` webhook calls from Shopify, checking their signature and handing the order to the
//!   relay engine, which formats it as XML and uploads it to the merchant's FTP server.
//! * Serving the settings API that merchants use to save and test their FTP credentials.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/shopify/webhooks?topic=orders/create`: The Shopify webhook endpoint.
//! * `/api/shops/{shop}/ftp_settings`: Read (`GET`) or save (`POST`) a shop's FTP settings.
//! * `/api/shops/{shop}/ftp_settings/test`: Check a set of FTP credentials without saving them.
//! * `/api/shops/{shop}/status`: Whether a shop has FTP settings.
//!
//! Everything under `/api` requires `Authorization: Bearer <OFR_ADMIN_TOKEN>`.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod helpers;
pub mod middleware;
pub mod routes;
pub mod server;

pub mod webhook_routes;
