//! # FTP transfer client
//!
//! Every call opens a fresh control connection, logs in, changes into [`UPLOAD_DIRECTORY`] and closes the connection
//! again. Nothing is pooled or retried.
//!
//! The FTP protocol stack is blocking, so each session runs on tokio's blocking thread pool. Two guards make sure
//! nothing leaks, whichever way a session ends:
//! * [`FtpSession`] sends `QUIT` when it is dropped.
//! * uploads are staged in a [`tempfile::NamedTempFile`], which is removed from disk when it is dropped.
mod session;

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use log::*;
use tempfile::Builder;

use crate::{
    db_types::FtpCredentials,
    order_xml::{OrderDocument, UploadReceipt},
    traits::{OrderUploader, TransferError, TransferStage},
};
pub use session::FtpSession;

/// Orders are always dropped into this directory, relative to the FTP user's home directory.
pub const UPLOAD_DIRECTORY: &str = "in";

#[derive(Debug, Clone)]
pub struct FtpClient {
    work_dir: PathBuf,
}

impl Default for FtpClient {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl FtpClient {
    /// Create a new client. Temporary upload files are created in `work_dir`.
    pub fn new<P: Into<PathBuf>>(work_dir: P) -> Self {
        Self { work_dir: work_dir.into() }
    }
}

impl OrderUploader for FtpClient {
    async fn test_connection(&self, credentials: &FtpCredentials) -> Result<(), TransferError> {
        let credentials = credentials.clone();
        run_blocking(move || {
            let _session = FtpSession::open(&credentials)?;
            info!("📂️ Connection test for {credentials} succeeded");
            Ok(())
        })
        .await
    }

    async fn upload_document(
        &self,
        credentials: &FtpCredentials,
        document: OrderDocument,
    ) -> Result<UploadReceipt, TransferError> {
        let credentials = credentials.clone();
        let work_dir = self.work_dir.clone();
        run_blocking(move || upload_via_temp_file(&credentials, &work_dir, &document)).await
    }
}

fn upload_via_temp_file(
    credentials: &FtpCredentials,
    work_dir: &Path,
    document: &OrderDocument,
) -> Result<UploadReceipt, TransferError> {
    let local_file_error = |e: std::io::Error| TransferError::failed(TransferStage::LocalFile, e);
    let mut temp_file = Builder::new().prefix("order_").suffix(".xml").tempfile_in(work_dir).map_err(local_file_error)?;
    temp_file.write_all(document.contents.as_bytes()).and_then(|()| temp_file.flush()).map_err(local_file_error)?;
    trace!("📂️ Staged {} in {}", document.file_name, temp_file.path().display());
    let mut source = temp_file.reopen().map_err(local_file_error)?;
    let mut session = FtpSession::open(credentials)?;
    let bytes = session.put(&document.file_name, &mut source)?;
    let remote_path = format!("{UPLOAD_DIRECTORY}/{}", document.file_name);
    info!("📂️ Uploaded {bytes} bytes to {remote_path} on {credentials}");
    Ok(UploadReceipt { remote_path, bytes })
}

async fn run_blocking<T, F>(f: F) -> Result<T, TransferError>
where
    F: FnOnce() -> Result<T, TransferError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!("📂️ FTP task did not complete. {e}");
        TransferError::Aborted(e.to_string())
    })?
}
