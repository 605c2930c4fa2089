use anyhow::Context;
use clap::Parser;
use expenses_etl::core::ConfigProvider;
use expenses_etl::utils::error::{ErrorSeverity, IngestError};
use expenses_etl::utils::{logger, validation::Validate};
use expenses_etl::{
    CliConfig, IngestEngine, IngestOutcome, LocalStorage, LocalUpload, TomlConfig, TsvPipeline,
};

const REJECTED_EXIT_CODE: i32 = 4;

fn exit_with(e: IngestError) -> ! {
    tracing::error!(
        "❌ Ingest failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium | ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    if let Some(path) = config.config.clone() {
        let toml = TomlConfig::from_file(&path)
            .with_context(|| format!("failed to load config file '{}'", path.display()))?;
        config.apply_toml(&toml);
    }

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting expenses-etl");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let upload = match LocalUpload::from_path(
        &config.input,
        config.file_name.clone(),
        config.content_type.clone(),
    )
    .await
    {
        Ok(upload) => upload,
        Err(e) => exit_with(e),
    };

    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = IngestEngine::new(TsvPipeline::new(storage, config));

    match engine.run(Some(&upload)).await {
        Ok(IngestOutcome::Loaded {
            output_path,
            records,
        }) => {
            tracing::info!("✅ File uploaded successfully.");
            println!("✅ File uploaded successfully.");
            println!("📁 {} transactions saved to: {}", records, output_path);
        }
        Ok(IngestOutcome::Rejected(rejection)) => {
            eprintln!("❌ {}", rejection);
            std::process::exit(REJECTED_EXIT_CODE);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}
