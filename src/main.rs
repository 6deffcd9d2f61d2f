// folio binary entry point.
// Loads configuration, wires the aggregator, and runs the terminal UI.

mod app;
mod state;
mod ui;

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use folio::cache::{self, FileStore};
use folio::github::{Api, GitHubClient, RetryPolicy};
use folio::{Aggregator, AggregatorOptions, Config, EnrichMode};

use app::App;

/// Pause between concurrent enrichment batches.
const BATCH_DELAY: Duration = Duration::from_millis(150);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let base = cache::base_dir(config.cache_dir.as_deref())
        .ok_or("could not determine a cache directory")?;
    init_tracing(&base)?;

    let client = GitHubClient::new(config.token.as_deref(), config.request_timeout)?;
    let api = Api::new(
        client,
        config.api_url.clone(),
        RetryPolicy {
            timeout: config.request_timeout,
            ..RetryPolicy::default()
        },
    );

    let options = AggregatorOptions {
        projects_ttl: config.projects_ttl,
        commits_ttl: config.commits_ttl,
        enrich_mode: match config.batch_width {
            Some(width) => EnrichMode::Batched {
                width,
                delay: BATCH_DELAY,
            },
            None => EnrichMode::default(),
        },
        ..AggregatorOptions::default()
    };

    let aggregator = Aggregator::new(
        config.account.clone(),
        config.token.is_some(),
        api,
        FileStore::new(cache::store_dir(&base)),
        options,
    );
    tracing::info!(
        "starting folio for {} ({})",
        config.account,
        if config.token.is_some() { "authenticated" } else { "public" }
    );

    let mut terminal = ratatui::init();
    let mut app = App::new(Arc::new(aggregator));
    let result = app.run(&mut terminal);
    ratatui::restore();

    result?;
    Ok(())
}

/// Log to a file under the cache directory; stdout belongs to the TUI.
fn init_tracing(base: &Path) -> std::io::Result<()> {
    fs::create_dir_all(base)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(cache::log_path(base))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "folio=info".into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}
