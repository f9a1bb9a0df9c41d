use ofr_common::ShopDomain;
use thiserror::Error;

use crate::db_types::{FtpSettings, NewFtpSettings};

#[derive(Debug, Clone, Error)]
pub enum FtpSettingsError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The FTP settings record for {0} is corrupt. {1}")]
    CorruptRecord(ShopDomain, String),
}

impl From<sqlx::Error> for FtpSettingsError {
    fn from(e: sqlx::Error) -> Self {
        FtpSettingsError::DatabaseError(e.to_string())
    }
}

#[allow(async_fn_in_trait)]
pub trait FtpSettingsStore {
    /// Fetch the FTP settings for the given shop, if the merchant has saved any.
    async fn fetch_ftp_settings(&self, shop: &ShopDomain) -> Result<Option<FtpSettings>, FtpSettingsError>;
    /// Insert the settings for a shop, or replace the existing record. Returns the stored record.
    async fn upsert_ftp_settings(&self, settings: NewFtpSettings) -> Result<FtpSettings, FtpSettingsError>;
}
