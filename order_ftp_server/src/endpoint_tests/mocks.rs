use mockall::mock;
use ofr_common::ShopDomain;
use order_ftp_engine::{
    db_types::{FtpCredentials, FtpSettings, NewFtpSettings},
    order_xml::{OrderDocument, UploadReceipt},
    traits::{FtpSettingsError, FtpSettingsStore, OrderUploader, TransferError},
};

mock! {
    pub SettingsStore {}
    impl FtpSettingsStore for SettingsStore {
        async fn fetch_ftp_settings(&self, shop: &ShopDomain) -> Result<Option<FtpSettings>, FtpSettingsError>;
        async fn upsert_ftp_settings(&self, settings: NewFtpSettings) -> Result<FtpSettings, FtpSettingsError>;
    }
}

mock! {
    pub Uploader {}
    impl OrderUploader for Uploader {
        async fn test_connection(&self, credentials: &FtpCredentials) -> Result<(), TransferError>;
        async fn upload_document(&self, credentials: &FtpCredentials, document: OrderDocument) -> Result<UploadReceipt, TransferError>;
    }
}
