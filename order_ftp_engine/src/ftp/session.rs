use std::io::Read;

use log::*;
use suppaftp::FtpStream;

use super::UPLOAD_DIRECTORY;
use crate::{
    db_types::FtpCredentials,
    traits::{TransferError, TransferStage},
};

/// An authenticated FTP session whose working directory is [`UPLOAD_DIRECTORY`].
///
/// The control connection is closed with `QUIT` when the session is dropped.
pub struct FtpSession {
    stream: FtpStream,
    peer: String,
}

impl FtpSession {
    pub fn open(credentials: &FtpCredentials) -> Result<Self, TransferError> {
        debug!("📂️ Connecting to {credentials}");
        let stream = FtpStream::connect((credentials.host.as_str(), credentials.port)).map_err(|e| {
            warn!("📂️ Could not connect to {credentials}. {e}");
            TransferError::failed(TransferStage::Connect, e)
        })?;
        let mut session = Self { stream, peer: credentials.to_string() };
        session.stream.login(credentials.username.as_str(), credentials.password.reveal().as_str()).map_err(|e| {
            warn!("📂️ Login to {credentials} failed. {e}");
            TransferError::failed(TransferStage::Login, e)
        })?;
        session.stream.cwd(UPLOAD_DIRECTORY).map_err(|e| {
            warn!("📂️ Could not enter the '{UPLOAD_DIRECTORY}' directory on {credentials}. {e}");
            TransferError::failed(TransferStage::ChangeDirectory, e)
        })?;
        trace!("📂️ Session open on {credentials}, in '{UPLOAD_DIRECTORY}'");
        Ok(session)
    }

    pub fn put<R: Read>(&mut self, file_name: &str, source: &mut R) -> Result<u64, TransferError> {
        self.stream.put_file(file_name, source).map_err(|e| {
            warn!("📂️ Upload of {file_name} to {} failed. {e}", self.peer);
            TransferError::failed(TransferStage::Upload, e)
        })
    }
}

impl Drop for FtpSession {
    fn drop(&mut self) {
        match self.stream.quit() {
            Ok(()) => trace!("📂️ Closed FTP session on {}", self.peer),
            Err(e) => debug!("📂️ FTP session on {} did not close cleanly. {e}", self.peer),
        }
    }
}
