use crate::core::{IngestOutcome, Pipeline, Rejection, UploadSource, Validation};
use crate::utils::error::Result;

pub struct IngestEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> IngestEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Validate, then process. A rejected upload is an `Ok` outcome and
    /// nothing gets written for it.
    pub async fn run<U: UploadSource>(&self, upload: Option<&U>) -> Result<IngestOutcome> {
        tracing::info!("Validating upload...");
        let upload = match (self.pipeline.validate(upload).await?, upload) {
            (Validation::Accepted, Some(upload)) => upload,
            (Validation::Accepted, None) => return Ok(IngestOutcome::Rejected(Rejection::NoFile)),
            (Validation::Rejected(rejection), _) => {
                tracing::warn!("Upload rejected: {}", rejection);
                return Ok(IngestOutcome::Rejected(rejection));
            }
        };
        tracing::info!(
            "Accepted '{}' ({} bytes)",
            upload.file_name(),
            upload.len()
        );

        let (output_path, records) = self.process(upload).await?;
        Ok(IngestOutcome::Loaded {
            output_path,
            records,
        })
    }

    /// Parse an accepted upload and write the whole batch. The batch is only
    /// handed to the sink once every line has parsed.
    pub async fn process<U: UploadSource>(&self, upload: &U) -> Result<(String, usize)> {
        tracing::info!("Parsing transactions...");
        let batch = self.pipeline.parse(upload).await?;
        let records = batch.len();
        tracing::info!("Parsed {} transactions", records);

        tracing::info!("Writing JSON document...");
        let output_path = self.pipeline.load(batch).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok((output_path, records))
    }
}
