use clap::Parser;
use secret_santa::utils::{logger, validation::Validate};
use secret_santa::{CliConfig, DrawPipeline, DrawRunner, LocalStorage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if let Err(e) = logger::init_logger(config.verbose, config.log_file.as_deref()) {
        eprintln!("❌ Failed to open log file: {}", e);
        std::process::exit(e.exit_code());
    }

    tracing::info!("Starting secret-santa CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let pipeline = DrawPipeline::new(LocalStorage::default(), config);
    let runner = DrawRunner::new(pipeline);

    match runner.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Assignments generated successfully!");
            println!("✅ Assignments generated successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Error during assignment generation: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
