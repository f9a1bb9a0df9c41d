//! Data types that are stored in, or read from, the settings database.
use std::fmt::Display;

use chrono::{DateTime, Utc};
use ofr_common::{Secret, ShopDomain};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::traits::FtpSettingsError;

pub const DEFAULT_FTP_PORT: u16 = 21;

/// The connection details a merchant enters on the settings form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FtpCredentials {
    pub host: String,
    #[serde(default = "default_ftp_port")]
    pub port: u16,
    pub username: String,
    pub password: Secret<String>,
}

fn default_ftp_port() -> u16 {
    DEFAULT_FTP_PORT
}

impl FtpCredentials {
    pub fn new<S1: Into<String>, S2: Into<String>, S3: Into<String>>(
        host: S1,
        port: u16,
        username: S2,
        password: S3,
    ) -> Self {
        Self { host: host.into(), port, username: username.into(), password: Secret::new(password.into()) }
    }
}

impl Display for FtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}:{}", self.username, self.host, self.port)
    }
}

//--------------------------------------     FtpSettings       --------------------------------------------------------
/// The FTP settings record for a single shop. There is at most one of these per shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpSettings {
    pub shop: ShopDomain,
    pub credentials: FtpCredentials,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFtpSettings {
    pub shop: ShopDomain,
    pub credentials: FtpCredentials,
}

impl NewFtpSettings {
    pub fn new(shop: ShopDomain, credentials: FtpCredentials) -> Self {
        Self { shop, credentials }
    }
}

/// A public view of [`FtpSettings`] that is safe to hand back to clients. The password is never included.
#[derive(Debug, Clone, Serialize)]
pub struct FtpSettingsView {
    pub shop: ShopDomain,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub has_password: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<&FtpSettings> for FtpSettingsView {
    fn from(settings: &FtpSettings) -> Self {
        Self {
            shop: settings.shop.clone(),
            host: settings.credentials.host.clone(),
            port: settings.credentials.port,
            username: settings.credentials.username.clone(),
            has_password: !settings.credentials.password.is_empty(),
            updated_at: settings.updated_at,
        }
    }
}

/// Row image of the `ftp_settings` table.
#[derive(Debug, Clone, FromRow)]
pub struct FtpSettingsRow {
    pub shop: ShopDomain,
    pub host: String,
    pub port: i64,
    pub username: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<FtpSettingsRow> for FtpSettings {
    type Error = FtpSettingsError;

    fn try_from(row: FtpSettingsRow) -> Result<Self, Self::Error> {
        let port = u16::try_from(row.port).map_err(|_| {
            FtpSettingsError::CorruptRecord(row.shop.clone(), format!("port {} is out of range", row.port))
        })?;
        Ok(Self {
            shop: row.shop,
            credentials: FtpCredentials {
                host: row.host,
                port,
                username: row.username,
                password: Secret::new(row.password),
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
