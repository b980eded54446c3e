use crate::utils::error::Result;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 函式庫與兩個執行檔（`secret_santa`、`toml_santa`）的事件都要保留
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "secret_santa=debug,toml_santa=debug,info"
    } else {
        "secret_santa=info,toml_santa=info"
    }
}

fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// 終端輸出之外，另外把 JSON 格式的紀錄附加到 `path`
pub fn init_file_logger(verbose: bool, path: &str) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .json(),
        )
        .init();

    Ok(())
}

pub fn init_logger(verbose: bool, log_file: Option<&str>) -> Result<()> {
    match log_file {
        Some(path) => init_file_logger(verbose, path),
        None => {
            init_cli_logger(verbose);
            Ok(())
        }
    }
}
