//! Sqlite database operations for the per-shop FTP settings.
//!
//! Generally clients should never call these methods directly, and prefer to use the [`FtpSettingsStore`] trait
//! methods that are implemented on the [`SqliteDatabase`] struct instead.
//!
//! [`FtpSettingsStore`]: crate::traits::FtpSettingsStore
//! [`SqliteDatabase`]: super::SqliteDatabase
use chrono::Utc;
use log::debug;
use ofr_common::ShopDomain;
use sqlx::SqliteConnection;

use crate::{
    db_types::{FtpSettings, FtpSettingsRow, NewFtpSettings},
    traits::FtpSettingsError,
};

pub async fn fetch_by_shop(
    shop: &ShopDomain,
    conn: &mut SqliteConnection,
) -> Result<Option<FtpSettings>, FtpSettingsError> {
    let row: Option<FtpSettingsRow> = sqlx::query_as("SELECT * FROM ftp_settings WHERE shop = ?;")
        .bind(shop)
        .fetch_optional(conn)
        .await?;
    row.map(FtpSettings::try_from).transpose()
}

/// Inserts the settings for a shop, or overwrites every field of the existing record if there is one.
pub async fn upsert(settings: NewFtpSettings, conn: &mut SqliteConnection) -> Result<FtpSettings, FtpSettingsError> {
    let now = Utc::now();
    let credentials = settings.credentials;
    let row: FtpSettingsRow = sqlx::query_as(
        r#"INSERT INTO ftp_settings (shop, host, port, username, password, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
        ON CONFLICT (shop) DO UPDATE SET
            host = excluded.host,
            port = excluded.port,
            username = excluded.username,
            password = excluded.password,
            updated_at = excluded.updated_at
        RETURNING *;
        "#,
    )
    .bind(&settings.shop)
    .bind(credentials.host)
    .bind(i64::from(credentials.port))
    .bind(credentials.username)
    .bind(credentials.password.reveal())
    .bind(now)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ FTP settings for {} saved", settings.shop);
    FtpSettings::try_from(row)
}
