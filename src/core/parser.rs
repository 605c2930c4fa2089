use crate::core::lines::LineReader;
use crate::domain::model::{Transaction, TransactionBatch, TRANSACTION_FIELD_COUNT};
use crate::utils::error::{IngestError, Result};
use tokio::io::AsyncRead;

pub const FIELD_DELIMITER: char = '\t';

/// Map one TSV line onto a [`Transaction`].
///
/// The first eight tab-separated fields are taken positionally and anything
/// after the eighth is dropped. Fewer than eight fields is a
/// [`IngestError::MalformedLine`]; short rows are never padded.
pub fn parse_line(line_number: usize, line: &str) -> Result<Transaction> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();

    if fields.len() < TRANSACTION_FIELD_COUNT {
        return Err(IngestError::MalformedLine {
            line: line_number,
            fields: fields.len(),
        });
    }

    Ok(Transaction::new(std::array::from_fn(|i| {
        fields[i].to_string()
    })))
}

/// Read every line of `reader` into a batch, in order.
///
/// Stops at the first malformed line; the partial batch is discarded.
pub async fn parse_transactions<R: AsyncRead + Unpin>(reader: R) -> Result<TransactionBatch> {
    let mut lines = LineReader::new(reader);
    let mut batch = TransactionBatch::new();

    while let Some(line) = lines.next_line().await? {
        let transaction = parse_line(lines.line_number(), &line)?;
        batch.push(transaction);
    }

    tracing::debug!("Parsed {} lines", lines.line_number());
    Ok(batch)
}
