use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use repasse_core::history::HistoryCache;
use repasse_core::service::HttpService;
use repasse_tui::app::App;
use repasse_tui::config::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "repasse",
    version,
    about = "Look up federal transfers to a municipality from the terminal"
)]
struct Cli {
    /// Path to config file (default: ~/.config/repasse/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the lookup service (overrides config)
    #[arg(short = 'u', long)]
    api_url: Option<String>,

    /// History snapshot file (overrides config)
    #[arg(long)]
    history: Option<String>,

    /// Theme name (overrides config)
    #[arg(short, long)]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };

    // Initialize logging to file
    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("repasse");
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::File::create(log_dir.join("repasse.log"))?;

    let directive = format!("repasse={}", config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    info!("Repasse starting");

    // Apply CLI overrides
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(path) = cli.history {
        config.history.path = Some(path);
    }
    if let Some(theme) = cli.theme {
        config.general.theme = theme;
    }

    let service = HttpService::new(&config.api)
        .with_context(|| format!("cannot use service at {}", config.api.base_url))?;
    info!(
        "service: search {} lookup {}",
        service.search_url(),
        service.lookup_url()
    );

    let history = HistoryCache::load(config.history.resolve_path(), config.history.capacity);

    // Create and run the app
    let mut app = App::new(config, Arc::new(service), history);
    app.run().await?;

    info!("Repasse exiting");
    Ok(())
}
