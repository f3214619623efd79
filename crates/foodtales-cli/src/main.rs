//! FoodTales CLI - a terminal client for the FoodTales food social network.
//!
//! Signs in against the FoodTales backend, keeps the session in the OS
//! keychain, and lists posts, comments, restaurants and dishes.

mod commands;
mod format;

use std::process::ExitCode;

use anyhow::Result;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use foodtales_core::{ApiClient, Config, KeyringStore, SessionStore};

use commands::Command;

/// Log file name in the cache directory
const LOG_FILE: &str = "foodtales.log";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to a file in the cache directory when it is available, else to
/// stderr. Use RUST_LOG to control the level (e.g. RUST_LOG=debug).
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match config.cache_dir() {
        Ok(dir) if std::fs::create_dir_all(&dir).is_ok() => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        _ => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match commands::parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n", e);
            eprintln!("{}", commands::USAGE);
            return ExitCode::from(2);
        }
    };
    if matches!(command, Command::Help) {
        println!("{}", commands::USAGE);
        return ExitCode::SUCCESS;
    }

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    let log_guard = init_tracing(&config);
    info!(base_url = %config.base_url, "FoodTales CLI starting");

    match run(command, &mut config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_failure(&e, log_guard),
    }
}

async fn run(command: Command, config: &mut Config) -> Result<()> {
    let session = SessionStore::open(KeyringStore::new(config.keyring_service.clone()))?;
    session.wait_until_loaded().await;
    let api = ApiClient::new(config)?.with_session(session.clone());

    let result = commands::run(command, &api, &session, config).await;

    // Make sure session changes reach the keychain before exiting
    session.flush().await;
    result
}

/// Log and print a failed command, flushing the log file before exit.
fn report_failure(e: &anyhow::Error, log_guard: Option<WorkerGuard>) -> ExitCode {
    error!(error = %e, "Command failed");
    eprintln!("Error: {}", e);
    drop(log_guard);
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_report_failure_flushes_pending_log_lines() {
        let buf = SharedBuf::default();
        let (mut writer, guard) = tracing_appender::non_blocking(buf.clone());
        writer.write_all(b"fetching dishes failed\n").unwrap();

        report_failure(&anyhow::anyhow!("boom"), Some(guard));

        let logged = String::from_utf8_lossy(&buf.0.lock().unwrap()).into_owned();
        assert!(logged.contains("fetching dishes failed"));
    }
}
