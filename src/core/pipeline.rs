use crate::core::{parser, validator};
use crate::core::{ConfigProvider, Pipeline, Storage, TransactionBatch, UploadSource, Validation};
use crate::utils::error::Result;

/// TSV upload to JSON document, written through `storage`.
pub struct TsvPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> TsvPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for TsvPipeline<S, C> {
    async fn validate<U: UploadSource>(&self, upload: Option<&U>) -> Result<Validation> {
        validator::validate_upload(upload).await
    }

    async fn parse<U: UploadSource>(&self, upload: &U) -> Result<TransactionBatch> {
        tracing::debug!("Re-opening '{}' for parsing", upload.file_name());
        let reader = upload.open().await?;
        parser::parse_transactions(reader).await
    }

    async fn load(&self, batch: TransactionBatch) -> Result<String> {
        let output_file = self.config.output_file();

        let json = batch.to_json_pretty()?;
        tracing::debug!(
            "Writing {} transactions ({} bytes) to storage",
            batch.len(),
            json.len()
        );
        self.storage.write_file(output_file, json.as_bytes()).await?;

        Ok(self.storage.location(output_file))
    }
}
