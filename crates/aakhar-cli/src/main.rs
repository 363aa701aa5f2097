//! Aakhar - an offline-first Uttarakhandi vocabulary trainer for the terminal.
//!
//! The interactive shell shows one page at a time and reads actions from
//! stdin. The remaining commands inspect or prepare the offline cache.

mod shell;

use std::io;

use aakhar_core::{App, Config, Fetch};
use anyhow::{bail, Result};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Set to any value to also write logs to `<cache dir>/logs`.
const LOG_FILE_ENV: &str = "AAKHAR_LOG_FILE";
const LOG_FILE_NAME: &str = "aakhar.log";

const USAGE: &str = "\
Usage: aakhar [COMMAND]

Commands:
  shell [#route]   Interactive session (default), starting at the given route
  install          Download the app shell into a fresh offline cache
  fetch <path>     Request a path or URL through the offline cache
  render <#route>  Print the markup a route renders
  cache            List the offline cache stores and their entries
  help             Show this message";

/// Keeps the background log writer alive until main returns.
struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Initialize the tracing subscriber for logging
fn init_tracing(config: &Config) -> Option<FileLogGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = std::env::var_os(LOG_FILE_ENV)
        .and_then(|_| config.cache_dir().ok())
        .map(|dir| dir.join("logs"));

    match log_dir {
        Some(dir) => {
            let appender = RollingFileAppender::new(Rotation::DAILY, &dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(FileLogGuard { _guard: guard })
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load()?;
    let _log_guard = init_tracing(&config);
    info!(version = env!("CARGO_PKG_VERSION"), "Aakhar starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("shell");
    let argument = args.get(1).map(String::as_str);

    if matches!(command, "help" | "--help" | "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    let app = App::new(config)?;
    match command {
        "shell" => shell::run(&app, argument.unwrap_or("#home")).await,
        "install" => install(&app).await,
        "fetch" => match argument {
            Some(path) => fetch(&app, path).await,
            None => bail!("fetch needs a path or URL\n\n{}", USAGE),
        },
        "render" => render(&app, argument.unwrap_or("#home")).await,
        "cache" => list_cache(&app),
        other => bail!("Unknown command `{}`\n\n{}", other, USAGE),
    }
}

/// Start the worker for one-shot commands. Offline with nothing installed,
/// requests simply go to the network.
async fn start_worker(app: &App) {
    if let Err(e) = app.start_worker().await {
        warn!(error = %format!("{:#}", e), "Continuing without offline cache");
    }
}

async fn install(app: &App) -> Result<()> {
    let removed = app.register_worker().await?;
    let worker = app.worker()?;
    let settings = worker.settings();
    println!(
        "Installed {} ({} shell files)",
        settings.static_name,
        settings.shell.len()
    );
    for store in removed {
        println!("Removed outdated store {}", store);
    }
    Ok(())
}

async fn fetch(app: &App, path: &str) -> Result<()> {
    start_worker(app).await;
    let url = app.context.data.resolve(path)?;
    let response = app.registration.fetch(&url).await?;
    println!("{} {} ({} bytes)", response.status, response.url, response.body.len());
    if let Some(content_type) = response.header("content-type") {
        println!("content-type: {}", content_type);
    }
    // Data files are worth reading; anything else is only summarized
    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(&response.body) {
        println!("{}", serde_json::to_string_pretty(&json)?);
    }
    Ok(())
}

async fn render(app: &App, fragment: &str) -> Result<()> {
    start_worker(app).await;
    let mut router = app.router();
    router.navigate(fragment).await;
    println!("{}", router.container().html());
    Ok(())
}

fn list_cache(app: &App) -> Result<()> {
    let names = app.storage.keys()?;
    if names.is_empty() {
        println!("No offline cache in {}", app.storage.root().display());
        return Ok(());
    }

    for name in names {
        let entries = app.storage.open(&name)?.entries()?;
        println!("{} ({} entries)", name, entries.len());
        for entry in entries {
            println!("  {} {}  {}", entry.data.status, entry.data.url, entry.age_display());
        }
    }
    Ok(())
}
