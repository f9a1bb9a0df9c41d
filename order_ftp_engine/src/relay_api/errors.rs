use ofr_common::ShopDomain;
use thiserror::Error;

use crate::{
    order_xml::FormatError,
    traits::{FtpSettingsError, TransferError},
};

#[derive(Debug, Clone, Error)]
pub enum RelayError {
    #[error("No FTP settings have been saved for {0}")]
    SettingsNotFound(ShopDomain),
    #[error("Settings store error. {0}")]
    Database(#[from] FtpSettingsError),
    #[error("{0}")]
    Format(#[from] FormatError),
    #[error("FTP transfer failed. {0}")]
    Transfer(#[from] TransferError),
}
