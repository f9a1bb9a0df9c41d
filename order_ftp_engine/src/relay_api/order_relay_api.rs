use std::fmt::Debug;

use chrono::Utc;
use log::*;
use ofr_common::ShopDomain;

use super::RelayError;
use crate::{
    db_types::{FtpCredentials, FtpSettings, NewFtpSettings},
    order_payload::OrderPayload,
    order_xml::{OrderDocument, UploadReceipt},
    traits::{FtpSettingsStore, OrderUploader},
};

/// Relays orders to the FTP server a shop has configured, and manages those settings.
pub struct OrderRelayApi<B, U> {
    db: B,
    uploader: U,
}

impl<B, U> Debug for OrderRelayApi<B, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderRelayApi")
    }
}

impl<B, U> OrderRelayApi<B, U>
where
    B: FtpSettingsStore,
    U: OrderUploader,
{
    pub fn new(db: B, uploader: U) -> Self {
        Self { db, uploader }
    }

    /// Look up the shop's FTP settings, format the order and upload it.
    ///
    /// If the shop has no settings, the uploader is never called and [`RelayError::SettingsNotFound`] is returned.
    pub async fn relay_order(&self, shop: &ShopDomain, order: &OrderPayload) -> Result<UploadReceipt, RelayError> {
        let settings = self.db.fetch_ftp_settings(shop).await?.ok_or_else(|| {
            info!("📦️ {shop} has no FTP settings. Order {} will not be relayed.", order.name());
            RelayError::SettingsNotFound(shop.clone())
        })?;
        let document = OrderDocument::for_order(shop, order, Utc::now())?;
        debug!("📦️ Order {} for {shop} formatted as {}", order.name(), document.file_name);
        let receipt = self.uploader.upload_document(&settings.credentials, document).await?;
        info!("📦️ Order {} for {shop} relayed to {}", order.name(), receipt.remote_path);
        Ok(receipt)
    }

    pub async fn fetch_settings(&self, shop: &ShopDomain) -> Result<Option<FtpSettings>, RelayError> {
        let settings = self.db.fetch_ftp_settings(shop).await?;
        Ok(settings)
    }

    pub async fn save_settings(&self, settings: NewFtpSettings) -> Result<FtpSettings, RelayError> {
        let saved = self.db.upsert_ftp_settings(settings).await?;
        info!("📦️ FTP settings for {} updated ({})", saved.shop, saved.credentials);
        Ok(saved)
    }

    /// Check that the credentials work, without saving them.
    pub async fn test_connection(&self, credentials: &FtpCredentials) -> Result<(), RelayError> {
        self.uploader.test_connection(credentials).await?;
        Ok(())
    }
}
