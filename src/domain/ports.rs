use crate::domain::model::{TransactionBatch, Validation};
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::io::AsyncRead;

/// Destination for the emitted document.
pub trait Storage: Send + Sync {
    /// Where `path` ends up, as reported back to the caller after a load.
    fn location(&self, path: &str) -> String;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
}

/// An uploaded file as handed over by the receiving layer.
///
/// Validation peeks at the first line and parsing starts again from the top,
/// so every call to [`UploadSource::open`] must return a reader positioned at
/// byte 0, independent of any reader handed out before.
pub trait UploadSource: Send + Sync {
    type Reader: AsyncRead + Unpin + Send;

    fn file_name(&self) -> &str;
    fn content_type(&self) -> &str;
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn open(&self) -> impl std::future::Future<Output = Result<Self::Reader>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn validate<U: UploadSource>(&self, upload: Option<&U>) -> Result<Validation>;
    async fn parse<U: UploadSource>(&self, upload: &U) -> Result<TransactionBatch>;
    async fn load(&self, batch: TransactionBatch) -> Result<String>;
}
