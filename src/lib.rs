pub mod console;
pub mod content;
pub mod fetch;
pub mod lifecycle;
pub mod presentation;
pub mod settings;
pub mod tracking;
mod utils;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use console::{parse_command, ConsoleCommand, USAGE};
use fetch::{FetchClient, HttpFetchClient, LocalFetchClient, SourceFetchClient};
use lifecycle::spawn_controller;
use presentation::LoggingSink;
use settings::{Settings, SettingsStore};
use tracking::{Recognizer, SharedRecognizer, TrackingEvent};

pub use utils::logging::LOG_TARGET;

/// Builds the fetch client for the configured sources: HTTP for remote
/// identifiers, `local_root` for everything else.
pub fn build_fetch_client(settings: &Settings) -> Result<Arc<dyn FetchClient>> {
    let remote = HttpFetchClient::new(settings.request_timeout(), &settings.user_agent)?;
    let local = LocalFetchClient::new(settings.local_root.clone());
    Ok(Arc::new(SourceFetchClient::new(Arc::new(remote), Arc::new(local))))
}

/// Console driver: reads tracking events from stdin and logs the presentation
/// commands the controller issues.
pub fn run() -> Result<()> {
    utils::logging::init();

    log::info!("reco-content starting up...");

    let store = SettingsStore::from_env()?;
    let settings = store.settings();
    log::info!("metadata source: {:?}", settings.metadata_source);

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(drive_console(settings))
}

async fn drive_console(settings: Settings) -> Result<()> {
    let fetcher = build_fetch_client(&settings)?;
    // Stands in for the cloud recognizer, which pauses itself once a target is found.
    let recognizer = SharedRecognizer::new(true, true);
    let controller = spawn_controller(
        &settings,
        fetcher,
        Arc::new(recognizer.clone()),
        Box::new(LoggingSink),
    );

    println!("{USAGE}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match parse_command(&line) {
            Some(ConsoleCommand::Event(event)) => {
                if matches!(event, TrackingEvent::TargetCreated { .. }) {
                    recognizer.set_enabled(false);
                }
                controller.send(event)?;
            }
            Some(ConsoleCommand::Status) => {
                let snapshot = controller.snapshot().await?;
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
            Some(ConsoleCommand::Quit) => break,
            None if line.trim().is_empty() => {}
            None => println!("{USAGE}"),
        }
    }

    controller.shutdown().await
}
