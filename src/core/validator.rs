use crate::core::lines::LineReader;
use crate::domain::model::{Rejection, Validation};
use crate::domain::ports::UploadSource;
use crate::domain::upload::TSV_CONTENT_TYPE;
use crate::utils::error::Result;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// 5MB.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
pub const TSV_EXTENSION: &str = "tsv";

/// Decide whether an upload may be parsed.
///
/// Checks run in a fixed order and the first failing one wins:
/// presence, extension plus declared content type, size, and finally the
/// shape of the first line. Only the first line is read, from a reader of its
/// own, so the caller has to re-open the upload to parse it.
///
/// A rejection is `Ok(Validation::Rejected(_))`; `Err` is reserved for I/O
/// failures while peeking at the content.
pub async fn validate_upload<U: UploadSource>(upload: Option<&U>) -> Result<Validation> {
    let Some(upload) = upload.filter(|upload| !upload.is_empty()) else {
        return Ok(Validation::Rejected(Rejection::NoFile));
    };

    if !has_tsv_extension(upload.file_name()) || upload.content_type() != TSV_CONTENT_TYPE {
        tracing::debug!(
            "Rejecting '{}' declared as '{}'",
            upload.file_name(),
            upload.content_type()
        );
        return Ok(Validation::Rejected(Rejection::InvalidFileType));
    }

    if upload.len() > MAX_UPLOAD_BYTES {
        tracing::debug!("Rejecting {} byte upload", upload.len());
        return Ok(Validation::Rejected(Rejection::FileTooLarge));
    }

    let reader = upload.open().await?;
    let mut lines = LineReader::new(reader.take(MAX_UPLOAD_BYTES));
    let first_line = lines.next_line().await?;

    match first_line {
        Some(line) if !line.is_empty() && line.contains('\t') => Ok(Validation::Accepted),
        _ => Ok(Validation::Rejected(Rejection::InvalidContent)),
    }
}

pub fn has_tsv_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TSV_EXTENSION))
}
