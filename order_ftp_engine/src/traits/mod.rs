//! # Backend contracts
//!
//! The relay talks to two external collaborators, and each one is hidden behind a trait so that the HTTP layer can be
//! exercised against mocks:
//!
//! * [`FtpSettingsStore`] persists one FTP settings record per shop. [`crate::SqliteDatabase`] is the shipped backend.
//! * [`OrderUploader`] pushes a formatted order document to a merchant's FTP server. [`crate::FtpClient`] is the
//!   shipped implementation.
mod ftp_settings_store;
mod order_uploader;

pub use ftp_settings_store::{FtpSettingsError, FtpSettingsStore};
pub use order_uploader::{OrderUploader, TransferError, TransferStage};
