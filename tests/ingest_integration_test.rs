use expenses_etl::{
    InMemoryUpload, IngestEngine, IngestError, IngestOutcome, LocalStorage, LocalUpload,
    OutputConfig, Rejection, Transaction, TsvPipeline,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const COFFEE: &str = "ACC1\tUSD\t2024-01-01\t100.00\t90.00\t2024-01-02\t-10.00\tCoffee";
const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

fn engine_for(out_dir: &Path) -> IngestEngine<TsvPipeline<LocalStorage, OutputConfig>> {
    let config = OutputConfig {
        output_path: out_dir.to_str().unwrap().to_string(),
        ..OutputConfig::default()
    };
    let storage = LocalStorage::new(config.output_path.clone());
    IngestEngine::new(TsvPipeline::new(storage, config))
}

fn output_file(out_dir: &Path) -> PathBuf {
    out_dir.join("transactions.json")
}

#[tokio::test]
async fn test_end_to_end_single_transaction() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let input = temp_dir.path().join("statement.tsv");
    std::fs::write(&input, COFFEE).unwrap();

    let upload = LocalUpload::from_path(&input, None, None).await.unwrap();
    let outcome = engine_for(&out_dir).run(Some(&upload)).await.unwrap();

    assert_eq!(
        outcome,
        IngestOutcome::Loaded {
            output_path: format!("{}/transactions.json", out_dir.to_str().unwrap()),
            records: 1,
        }
    );

    let written = std::fs::read_to_string(output_file(&out_dir)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{
            "accountNumber": "ACC1",
            "currency": "USD",
            "valueDate": "2024-01-01",
            "balanceBefore": "100.00",
            "balanceAfter": "90.00",
            "bookDate": "2024-01-02",
            "amount": "-10.00",
            "description": "Coffee"
        }])
    );
    assert!(written.contains("\n  {\n    \"accountNumber\""));
}

#[tokio::test]
async fn test_many_lines_keep_order_and_values() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");

    let lines: Vec<String> = (1..=25)
        .map(|i| {
            format!(
                "ACC{i}\tEUR\t2024-03-{d:02}\t{i}.00\t{j}.00\t2024-03-{d:02}\t-1.00\tPurchase {i}\textra",
                i = i,
                j = i - 1,
                d = i
            )
        })
        .collect();
    let content = format!("{}\r\n", lines.join("\r\n"));
    let upload = InMemoryUpload::tsv("statement.tsv", content);

    let outcome = engine_for(&out_dir).run(Some(&upload)).await.unwrap();
    assert!(matches!(outcome, IngestOutcome::Loaded { records: 25, .. }));

    let written = std::fs::read(output_file(&out_dir)).unwrap();
    let transactions: Vec<Transaction> = serde_json::from_slice(&written).unwrap();
    assert_eq!(transactions.len(), 25);
    for (i, tx) in transactions.iter().enumerate() {
        let n = i + 1;
        assert_eq!(tx.account_number(), format!("ACC{}", n));
        assert_eq!(tx.balance_before(), format!("{}.00", n));
        assert_eq!(tx.description(), format!("Purchase {}", n));
    }
}

#[tokio::test]
async fn test_processing_twice_is_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let engine = engine_for(&out_dir);
    let upload = InMemoryUpload::tsv("statement.tsv", format!("{}\n{}\n", COFFEE, COFFEE));

    engine.run(Some(&upload)).await.unwrap();
    let first = std::fs::read(output_file(&out_dir)).unwrap();

    engine.run(Some(&upload)).await.unwrap();
    let second = std::fs::read(output_file(&out_dir)).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_new_upload_replaces_previous_document() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let engine = engine_for(&out_dir);

    let three = InMemoryUpload::tsv("a.tsv", [COFFEE, COFFEE, COFFEE].join("\n"));
    engine.run(Some(&three)).await.unwrap();

    let other = "ACC9\tGBP\t2024-05-01\t1\t2\t2024-05-02\t1\tTea";
    engine
        .run(Some(&InMemoryUpload::tsv("b.tsv", other)))
        .await
        .unwrap();

    let written = std::fs::read(output_file(&out_dir)).unwrap();
    let transactions: Vec<Transaction> = serde_json::from_slice(&written).unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].account_number(), "ACC9");
}

#[tokio::test]
async fn test_rejected_upload_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let engine = engine_for(&out_dir);

    let cases = [
        (InMemoryUpload::tsv("statement.tsv", ""), Rejection::NoFile),
        (
            InMemoryUpload::tsv("statement.txt", COFFEE),
            Rejection::InvalidFileType,
        ),
        (
            InMemoryUpload::new("statement.tsv", "text/csv", COFFEE),
            Rejection::InvalidFileType,
        ),
        (
            InMemoryUpload::tsv("statement.tsv", "no tabs\nstill none"),
            Rejection::InvalidContent,
        ),
    ];

    for (upload, expected) in cases {
        let outcome = engine.run(Some(&upload)).await.unwrap();
        assert_eq!(outcome, IngestOutcome::Rejected(expected));
    }

    assert!(!out_dir.exists());
}

#[tokio::test]
async fn test_absent_upload_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let engine = engine_for(temp_dir.path());

    let outcome = engine.run::<InMemoryUpload>(None).await.unwrap();

    assert_eq!(outcome, IngestOutcome::Rejected(Rejection::NoFile));
    assert_eq!(
        Rejection::NoFile.to_string(),
        "No file uploaded.",
    );
}

#[tokio::test]
async fn test_size_limit_boundary_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let engine = engine_for(&out_dir);

    let prefix = "ACC1\tUSD\t2024-01-01\t100.00\t90.00\t2024-01-02\t-10.00\t";
    let mut content = prefix.as_bytes().to_vec();
    content.resize(MAX_UPLOAD_BYTES, b'x');

    let at_limit = InMemoryUpload::tsv("statement.tsv", content.clone());
    let outcome = engine.run(Some(&at_limit)).await.unwrap();
    assert!(matches!(outcome, IngestOutcome::Loaded { records: 1, .. }));

    content.push(b'x');
    let over_limit = InMemoryUpload::tsv("statement.tsv", content);
    let outcome = engine.run(Some(&over_limit)).await.unwrap();
    assert_eq!(outcome, IngestOutcome::Rejected(Rejection::FileTooLarge));
    assert_eq!(
        Rejection::FileTooLarge.to_string(),
        "File size exceeds the maximum limit of 5MB."
    );
}

#[tokio::test]
async fn test_malformed_line_fails_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let engine = engine_for(&out_dir);

    let upload = InMemoryUpload::tsv("statement.tsv", "A\tB\tC");
    let result = engine.run(Some(&upload)).await;

    assert!(matches!(
        result,
        Err(IngestError::MalformedLine { line: 1, fields: 3 })
    ));
    assert!(!output_file(&out_dir).exists());
}

#[tokio::test]
async fn test_malformed_line_keeps_previous_document() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let engine = engine_for(&out_dir);

    engine
        .run(Some(&InMemoryUpload::tsv("good.tsv", COFFEE)))
        .await
        .unwrap();
    let before = std::fs::read(output_file(&out_dir)).unwrap();

    let bad = InMemoryUpload::tsv("bad.tsv", format!("{}\n{}\nshort\tline", COFFEE, COFFEE));
    let result = engine.run(Some(&bad)).await;
    assert!(matches!(
        result,
        Err(IngestError::MalformedLine { line: 3, fields: 2 })
    ));

    assert_eq!(std::fs::read(output_file(&out_dir)).unwrap(), before);
}

#[tokio::test]
async fn test_trailing_newline_does_not_add_a_record() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let input = temp_dir.path().join("statement.TSV");
    std::fs::write(&input, format!("{}\n", COFFEE)).unwrap();

    let upload = LocalUpload::from_path(&input, None, None).await.unwrap();
    let outcome = engine_for(&out_dir).run(Some(&upload)).await.unwrap();

    assert!(matches!(outcome, IngestOutcome::Loaded { records: 1, .. }));
}

#[tokio::test]
async fn test_declared_content_type_is_not_inferred_when_given() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let input = temp_dir.path().join("statement.tsv");
    std::fs::write(&input, COFFEE).unwrap();

    let upload = LocalUpload::from_path(&input, None, Some("application/json".to_string()))
        .await
        .unwrap();
    let outcome = engine_for(&out_dir).run(Some(&upload)).await.unwrap();

    assert_eq!(outcome, IngestOutcome::Rejected(Rejection::InvalidFileType));
}

#[tokio::test]
async fn test_classic_mac_line_endings_keep_rows_apart() {
    let temp_dir = TempDir::new().unwrap();
    let out_dir = temp_dir.path().join("out");
    let second = "ACC2\tEUR\t2024-02-01\t5.00\t6.00\t2024-02-02\t1.00\tRefund";
    let upload = InMemoryUpload::tsv("statement.tsv", format!("{}\r{}\r", COFFEE, second));

    let outcome = engine_for(&out_dir).run(Some(&upload)).await.unwrap();
    assert!(matches!(outcome, IngestOutcome::Loaded { records: 2, .. }));

    let written = std::fs::read(output_file(&out_dir)).unwrap();
    let transactions: Vec<Transaction> = serde_json::from_slice(&written).unwrap();
    assert_eq!(transactions[0].description(), "Coffee");
    assert_eq!(transactions[1].account_number(), "ACC2");
    assert_eq!(transactions[1].description(), "Refund");
}
