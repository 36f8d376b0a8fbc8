//! The meetsync daemon: loads configuration and credentials, wires the
//! platform clients into the reconciliation engine, and either runs one
//! pass (`--once`) or keeps reconciling on the configured interval until
//! Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use log::{error, info};
use secrecy::SecretString;
use tokio::sync::broadcast;

use meetsync::auth::check_session_token;
use meetsync::banner::HttpBannerRenderer;
use meetsync::calendar::GoogleCalendarClient;
use meetsync::config::load_config;
use meetsync::error::ConfigError;
use meetsync::listing::MeetupClient;
use meetsync::store::FileStore;
use meetsync::streaming::StreamyardClient;
use meetsync::sync::{SyncConfig, SyncEngine, SyncScheduler};
use meetsync::{MeetsyncError, TokenStore};

#[derive(Parser)]
#[command(name = "meetsyncd")]
#[command(version)]
#[command(about = "Reconciles managed events against their streaming, listing, and calendar platforms", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a single reconciliation pass and exit
    #[arg(long)]
    once: bool,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("meetsync").join("config.yaml"))
}

fn run(cli: Cli) -> meetsync::Result<()> {
    let config_path = cli.config.or_else(default_config_path).ok_or_else(|| {
        MeetsyncError::Config(ConfigError::Validation {
            message: "no --config given and no default config directory exists".to_string(),
        })
    })?;

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)?;
    let tokens = TokenStore::new(&config.token_store).load()?;

    let jwt = SecretString::from(tokens.streaming.jwt);
    let csrf_token = SecretString::from(tokens.streaming.csrf_token);

    // The streaming session token cannot be refreshed programmatically, so
    // an expired one is a startup error rather than a pass full of 401s.
    if config.sync.features.stream_sync {
        check_session_token(&jwt, Utc::now())?;
    }

    let streaming = StreamyardClient::new(
        config.streaming.user_id.clone(),
        config.streaming.destinations.clone(),
        csrf_token,
        jwt,
    )?;
    let listing = MeetupClient::new(
        config.listing.group.clone(),
        SecretString::from(tokens.listing.access_token),
    )?;
    let calendar = GoogleCalendarClient::new(SecretString::from(tokens.calendar.access_token))?;
    let banner = HttpBannerRenderer::new(
        config.banner.renderer_url.clone(),
        config.banner.output_dir.clone(),
    )?;

    let engine = Arc::new(SyncEngine::new(
        FileStore::new(&config.event_store),
        SyncConfig::from_config(&config),
        Arc::new(streaming),
        Arc::new(listing),
        Arc::new(calendar),
        Arc::new(banner),
    ));

    if cli.once {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to build tokio runtime");
        let summary = runtime.block_on(engine.check_events(Utc::now()))?;
        info!("Reconciliation pass: {}", summary);
        return Ok(());
    }

    if !config.sync.enabled {
        info!("Scheduled sync is disabled in the configuration; nothing to do");
        return Ok(());
    }

    let interval = Duration::from_secs(config.sync.interval_mins * 60);
    let scheduler = Arc::new(SyncScheduler::new(Arc::clone(&engine), interval));
    let (trigger_tx, trigger_rx) = broadcast::channel(1);

    let handle = scheduler.start(trigger_rx);
    info!(
        "Scheduler started; a pass runs every {} minutes (Ctrl-C to stop)",
        config.sync.interval_mins
    );

    let ctrlc_scheduler = Arc::clone(&scheduler);
    ctrlc::set_handler(move || {
        info!("Shutdown requested");
        ctrlc_scheduler.stop();
        // Wake the scheduler out of its interval wait so it exits promptly.
        let _ = trigger_tx.send(());
    })
    .expect("failed to install Ctrl-C handler");

    if handle.join().is_err() {
        error!("Scheduler thread panicked");
    }

    Ok(())
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    info!("Starting meetsyncd v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}
