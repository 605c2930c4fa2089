use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of positional fields a TSV line maps onto.
pub const TRANSACTION_FIELD_COUNT: usize = 8;

/// One bank-statement line. Fields are kept verbatim; nothing checks that
/// dates or amounts are well formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    account_number: String,
    currency: String,
    value_date: String,
    balance_before: String,
    balance_after: String,
    book_date: String,
    amount: String,
    description: String,
}

impl Transaction {
    /// Fields in file order: account number, currency, value date, balance
    /// before, balance after, book date, amount, description.
    pub fn new(fields: [String; TRANSACTION_FIELD_COUNT]) -> Self {
        let [account_number, currency, value_date, balance_before, balance_after, book_date, amount, description] =
            fields;
        Self {
            account_number,
            currency,
            value_date,
            balance_before,
            balance_after,
            book_date,
            amount,
            description,
        }
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn value_date(&self) -> &str {
        &self.value_date
    }

    pub fn balance_before(&self) -> &str {
        &self.balance_before
    }

    pub fn balance_after(&self) -> &str {
        &self.balance_after
    }

    pub fn book_date(&self) -> &str {
        &self.book_date
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Transactions of one upload, in input line order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionBatch {
    transactions: Vec<Transaction>,
}

impl TransactionBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Indented JSON array with camelCase keys.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a TransactionBatch {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}

/// Why an upload was turned away. `Display` is the text shown to the uploader.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("No file uploaded.")]
    NoFile,

    #[error("Invalid file type. Only .TSV files are allowed.")]
    InvalidFileType,

    #[error("File size exceeds the maximum limit of 5MB.")]
    FileTooLarge,

    #[error("Invalid file content. The file must be in .TSV format.")]
    InvalidContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Accepted,
    Rejected(Rejection),
}

impl Validation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Validation::Accepted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Rejected(Rejection),
    Loaded { output_path: String, records: usize },
}
