//! `SqliteDatabase` is the concrete settings backend for the relay.
use std::fmt::Debug;

use log::*;
use ofr_common::ShopDomain;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::{ftp_settings, new_pool};
use crate::{
    db_types::{FtpSettings, NewFtpSettings},
    traits::{FtpSettingsError, FtpSettingsStore},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    /// Brings the schema up to date. Safe to call on every start-up.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/db/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&mut self) -> Result<(), sqlx::Error> {
        self.pool.close().await;
        Ok(())
    }
}

impl FtpSettingsStore for SqliteDatabase {
    async fn fetch_ftp_settings(&self, shop: &ShopDomain) -> Result<Option<FtpSettings>, FtpSettingsError> {
        let mut conn = self.pool.acquire().await?;
        let settings = ftp_settings::fetch_by_shop(shop, &mut conn).await?;
        trace!("🗃️ FTP settings for {shop} {}", if settings.is_some() { "found" } else { "not found" });
        Ok(settings)
    }

    async fn upsert_ftp_settings(&self, settings: NewFtpSettings) -> Result<FtpSettings, FtpSettingsError> {
        let mut tx = self.pool.begin().await?;
        let saved = ftp_settings::upsert(settings, &mut tx).await?;
        tx.commit().await?;
        Ok(saved)
    }
}
