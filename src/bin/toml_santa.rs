use clap::Parser;
use secret_santa::core::{ConfigProvider, Pipeline};
use secret_santa::utils::{logger, validation::Validate};
use secret_santa::{DrawPipeline, DrawRunner, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-santa")]
#[command(about = "Secret Santa draw driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "secret-santa.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the seed from the config
    #[arg(long)]
    seed: Option<u64>,

    /// Override max attempts from the config
    #[arg(long)]
    max_attempts: Option<usize>,

    /// Dry run - read and check the inputs without drawing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let verbose = args.verbose || config.verbose();
    if let Err(e) = logger::init_logger(verbose, config.log_file()) {
        eprintln!("❌ Failed to open log file: {}", e);
        std::process::exit(e.exit_code());
    }

    tracing::info!("🚀 Starting TOML-based Secret Santa draw");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(seed) = args.seed {
        config.draw.seed = Some(seed);
        tracing::info!("🔧 Seed overridden to: {}", seed);
    }
    if let Some(max_attempts) = args.max_attempts {
        config.draw.max_attempts = Some(max_attempts);
        tracing::info!("🔧 Max attempts overridden to: {}", max_attempts);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config);

    let pipeline = DrawPipeline::new(LocalStorage::default(), config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no draw will be made");
        perform_dry_run(&pipeline).await;
        return Ok(());
    }

    let runner = DrawRunner::new(pipeline);

    match runner.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Assignments generated successfully!");
            println!("✅ Assignments generated successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Error during assignment generation: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Draw: {}", config.draw_name());
    tracing::info!("   Participants: {}", config.participants_path());
    tracing::info!(
        "   Previous results: {}",
        config.previous_results_path().unwrap_or("(none)")
    );
    tracing::info!("   Max attempts: {}", config.max_attempts());
    if let Some(seed) = config.seed() {
        tracing::info!("   Seed: {}", seed);
    }
    if let Some(timeout) = config.timeout_seconds() {
        tracing::info!("   Timeout: {}s", timeout);
    }
    tracing::info!(
        "   Output: {}/{}.{{{}}}",
        config.output_path(),
        config.output_name(),
        config.output_formats().join(",")
    );
}

async fn perform_dry_run(pipeline: &DrawPipeline<LocalStorage, TomlConfig>) {
    match pipeline.extract().await {
        Ok(input) => {
            let unmatched = input.prior.unmatched_givers(&input.participants);
            println!("🔍 Dry run results:");
            println!("   Participants: {}", input.participants.len());
            for participant in &input.participants {
                let previous = input
                    .prior
                    .receiver_for(participant.name())
                    .unwrap_or("-");
                println!(
                    "   - {} <{}> (last time: {})",
                    participant.name(),
                    participant.address(),
                    previous
                );
            }
            if !unmatched.is_empty() {
                println!("   Previous entries ignored: {}", unmatched.join(", "));
            }
            if input.participants.len() < 2 {
                println!("⚠️ At least two participants are needed for a draw");
            }
        }
        Err(e) => {
            eprintln!("❌ Inputs could not be read: {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }
}
