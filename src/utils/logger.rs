use crate::config::toml_config::{LogFormat, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn filter_for(level: &str, verbose: bool) -> EnvFilter {
    let fallback = if verbose {
        "small_ledger=debug,info".to_string()
    } else {
        format!("small_ledger={}", level)
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

fn init_compact_logger(filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(filter)
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

pub fn init_cli_logger(verbose: bool) {
    init_compact_logger(filter_for("info", verbose));
}

pub fn init_json_logger(level: &str) {
    tracing_subscriber::registry()
        .with(filter_for(level, false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

/// Picks the formatter from `[logging]`. `--verbose` forces compact debug output.
pub fn init_from_config(logging: &LoggingConfig, verbose: bool) {
    if verbose {
        init_cli_logger(true);
        return;
    }

    match logging.format {
        LogFormat::Compact => init_compact_logger(filter_for(&logging.level, false)),
        LogFormat::Json => init_json_logger(&logging.level),
    }
}
