use crate::domain::ports::UploadSource;
use crate::utils::error::{IngestError, Result};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const TSV_CONTENT_TYPE: &str = "text/tab-separated-values";
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type a browser would declare for `file_name`.
pub fn content_type_for(file_name: &str) -> &'static str {
    let is_tsv = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));

    if is_tsv {
        TSV_CONTENT_TYPE
    } else {
        FALLBACK_CONTENT_TYPE
    }
}

/// Upload held in memory. Cloning shares the buffer.
#[derive(Debug, Clone)]
pub struct InMemoryUpload {
    file_name: String,
    content_type: String,
    bytes: Arc<[u8]>,
}

impl InMemoryUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: Arc::from(bytes.into()),
        }
    }

    /// `file_name` with a correctly declared TSV content type.
    pub fn tsv(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(file_name, TSV_CONTENT_TYPE, bytes)
    }
}

impl UploadSource for InMemoryUpload {
    type Reader = Cursor<Arc<[u8]>>;

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    async fn open(&self) -> Result<Self::Reader> {
        Ok(Cursor::new(Arc::clone(&self.bytes)))
    }
}

/// Upload backed by a file on disk; every `open` re-opens the file.
#[derive(Debug, Clone)]
pub struct LocalUpload {
    path: PathBuf,
    file_name: String,
    content_type: String,
    len: u64,
}

impl LocalUpload {
    /// Declared name defaults to the path's file name, declared content type
    /// to [`content_type_for`] of that name.
    pub async fn from_path(
        path: impl AsRef<Path>,
        file_name: Option<String>,
        content_type: Option<String>,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;

        if !metadata.is_file() {
            return Err(IngestError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            )));
        }

        let file_name = file_name.unwrap_or_else(|| {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        let content_type =
            content_type.unwrap_or_else(|| content_type_for(&file_name).to_string());

        Ok(Self {
            path,
            file_name,
            content_type,
            len: metadata.len(),
        })
    }
}

impl UploadSource for LocalUpload {
    type Reader = tokio::fs::File;

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn len(&self) -> u64 {
        self.len
    }

    async fn open(&self) -> Result<Self::Reader> {
        Ok(tokio::fs::File::open(&self.path).await?)
    }
}
