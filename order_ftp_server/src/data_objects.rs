use std::fmt::Display;

use ofr_common::{Secret, ShopDomain};
use order_ftp_engine::db_types::{FtpCredentials, DEFAULT_FTP_PORT};
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopStatus {
    pub shop: ShopDomain,
    pub has_ftp_settings: bool,
}

/// The FTP settings form, as submitted by the merchant.
///
/// The password may be left blank when the shop already has settings saved, in which case the stored password is
/// kept.
#[derive(Debug, Clone, Deserialize)]
pub struct FtpSettingsForm {
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u32,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: Option<Secret<String>>,
}

fn default_port() -> u32 {
    u32::from(DEFAULT_FTP_PORT)
}

impl FtpSettingsForm {
    /// Check the form and turn it into credentials. `saved_password` fills in a blank password.
    pub fn into_credentials(self, saved_password: Option<Secret<String>>) -> Result<FtpCredentials, ServerError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(ServerError::InvalidRequestBody("The FTP host is required.".into()));
        }
        let username = self.username.trim();
        if username.is_empty() {
            return Err(ServerError::InvalidRequestBody("The FTP username is required.".into()));
        }
        let port = u16::try_from(self.port)
            .ok()
            .filter(|p| *p > 0)
            .ok_or_else(|| ServerError::InvalidRequestBody(format!("{} is not a valid port number.", self.port)))?;
        let password = self
            .password
            .filter(|p| !p.is_empty())
            .or(saved_password)
            .ok_or_else(|| ServerError::InvalidRequestBody("The FTP password is required.".into()))?;
        Ok(FtpCredentials { host: host.to_string(), port, username: username.to_string(), password })
    }
}
