pub mod etl;
pub mod lines;
pub mod parser;
pub mod pipeline;
pub mod validator;

pub use crate::domain::model::{
    IngestOutcome, Rejection, Transaction, TransactionBatch, Validation,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, UploadSource};
pub use crate::utils::error::Result;
