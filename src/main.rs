use bithunter::cli::{commands, Cli, Commands};
use bithunter::config::{AppConfig, LoggingConfig};
use bithunter::error::Result;
use clap::Parser;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match AppConfig::load_from(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: could not load config from {} ({}), using defaults",
                cli.config.display(),
                e
            );
            AppConfig::default()
        }
    };
    init_logging(&config.logging);

    if let Err(errors) = config.validate() {
        for problem in &errors {
            warn!("invalid configuration: {}", problem);
        }
    }
    config.ensure_valid()?;

    let outcome = match &cli.command {
        Commands::Backtest {
            data,
            actions,
            seed,
            json,
        } => commands::run_backtest(&config, data, actions.as_deref(), *seed, *json),
        Commands::Simulate { data, steps, seed } => {
            commands::run_simulate(&config, data, *steps, *seed)
        }
        Commands::Sample {
            len,
            volatility,
            seed,
            out,
        } => commands::run_sample(*len, *volatility, *seed, out),
        Commands::Trade { action } => commands::run_trade(&config, *action).await,
        Commands::Config => commands::show_config(&config),
    };

    if let Err(e) = &outcome {
        error!("command failed: {}", e);
    }
    outcome
}

/// Install the tracing subscriber: env filter, console output (plain or
/// JSON), and a daily rolling file when `BITHUNTER_LOG_DIR` is set.
fn init_logging(logging: &LoggingConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},bithunter=debug", logging.level)));

    let log_dir = std::env::var("BITHUNTER_LOG_DIR").ok();

    // `rolling::daily` panics if it cannot create the first file, so check
    // writability up front.
    let file_layer = log_dir.as_deref().and_then(|dir| {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!(
                "Warning: Could not create log directory {} ({}), file logging disabled",
                dir, e
            );
            return None;
        }
        let probe = std::path::Path::new(dir).join(".bithunter_write_test");
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&probe)
        {
            Ok(_) => {
                let _ = std::fs::remove_file(&probe);
                let file_appender = tracing_appender::rolling::daily(dir, "bithunter.log");
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
                // Process-lifetime guard
                Box::leak(Box::new(guard));

                Some(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true),
                )
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not write to log directory {} ({}), file logging disabled",
                    dir, e
                );
                None
            }
        }
    });

    let (console_layer, json_layer) = if logging.json {
        (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            ),
        )
    } else {
        (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            ),
            None,
        )
    };

    let file_logging_enabled = file_layer.is_some();
    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .with(file_layer)
        .init();

    if let (true, Some(dir)) = (file_logging_enabled, log_dir) {
        eprintln!("Logging to: {}/bithunter.log", dir);
    }
}
