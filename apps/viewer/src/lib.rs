pub mod app;
pub mod config;
pub mod db;
pub mod feed;
pub mod ratings;
pub mod terminal;

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use deck_core::{GestureConfig, Session};
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ViewerConfig;
use crate::db::SqliteRepository;
use crate::feed::FeedClient;
use crate::terminal::TerminalSurface;

/// Shown in place of the deck when neither the feed nor the cache could
/// provide data.
pub const LOAD_FAILED_MESSAGE: &str = "Could not load data. Are you online?";

/// Fetch the feed and hand the result to the session.
pub fn load_into(runtime: &Runtime, client: &FeedClient, session: &mut Session<SqliteRepository>) {
    let result = runtime.block_on(client.load(session.engine_mut().store_mut()));
    match result {
        Ok(outcome) => session.apply_load(outcome),
        Err(e) => {
            tracing::error!(source = %client.source(), "feed load failed: {}", e);
            session.load_failed(LOAD_FAILED_MESSAGE);
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ViewerConfig::from_env();

    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating data directory {}", config.data_dir.display()))?;

    // The terminal belongs to the UI, so logs go to a file.
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .context("opening log file")?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(log_file))
                .with_ansi(false),
        )
        .init();

    tracing::info!(feed = %config.feed, data_dir = %config.data_dir.display(), "starting viewer");

    let repo = SqliteRepository::open_or_fallback(config.db_path())?;
    if let Some(path) = &config.import_ratings {
        if let Err(e) = ratings::import_ratings(&repo, path) {
            tracing::warn!(path = %path.display(), "rating import failed: {:#}", e);
        }
    }

    let client = FeedClient::new(config.feed.clone())?;
    let runtime = Runtime::new().context("starting async runtime")?;

    let mut session = Session::new(repo, GestureConfig::default());
    load_into(&runtime, &client, &mut session);

    let (width, height) = crossterm::terminal::size()?;
    session
        .gestures_mut()
        .set_fly_out_distance(app::fly_out_distance(width));

    {
        let _guard = app::TerminalGuard::enter()?;
        let mut surface = TerminalSurface::new(std::io::stdout(), width, height);
        app::run_loop(&mut session, &mut surface, |session| {
            load_into(&runtime, &client, session)
        })?;
    }

    if let Some(path) = &config.export_ratings {
        let json = ratings::export_ratings(session.engine().store())?;
        std::fs::write(path, json)
            .with_context(|| format!("writing ratings to {}", path.display()))?;
        tracing::info!(path = %path.display(), "exported ratings");
    }

    Ok(())
}
