use std::fmt::Display;

use thiserror::Error;

use crate::{
    db_types::FtpCredentials,
    order_xml::{OrderDocument, UploadReceipt},
};

/// The step of an FTP session that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStage {
    Connect,
    Login,
    ChangeDirectory,
    Upload,
    LocalFile,
}

impl Display for TransferStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Connect => "connect",
            Self::Login => "login",
            Self::ChangeDirectory => "change directory",
            Self::Upload => "upload",
            Self::LocalFile => "local file",
        };
        f.write_str(s)
    }
}

/// Any failure while talking to the merchant's FTP server. Callers get a single error type; the stage is recorded for
/// the logs and the settings form.
#[derive(Debug, Clone, Error)]
pub enum TransferError {
    #[error("Could not {stage}. {reason}")]
    Failed { stage: TransferStage, reason: String },
    #[error("The FTP task was aborted. {0}")]
    Aborted(String),
}

impl TransferError {
    pub fn failed<S: Display>(stage: TransferStage, reason: S) -> Self {
        Self::Failed { stage, reason: reason.to_string() }
    }

    pub fn stage(&self) -> Option<TransferStage> {
        match self {
            Self::Failed { stage, .. } => Some(*stage),
            Self::Aborted(_) => None,
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait OrderUploader {
    /// Open a session with the given credentials, change into the upload directory and close the session again.
    async fn test_connection(&self, credentials: &FtpCredentials) -> Result<(), TransferError>;
    /// Upload the document into the upload directory of the given server.
    async fn upload_document(
        &self,
        credentials: &FtpCredentials,
        document: OrderDocument,
    ) -> Result<UploadReceipt, TransferError>;
}
