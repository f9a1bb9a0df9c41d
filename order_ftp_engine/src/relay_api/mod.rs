//! The public API of the relay engine.
//!
//! [`OrderRelayApi`] is generic over its backends so that the server can run against SQLite and a real FTP client in
//! production, and against mocks in tests.
mod errors;
mod order_relay_api;

pub use errors::RelayError;
pub use order_relay_api::OrderRelayApi;
