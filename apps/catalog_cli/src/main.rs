use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use catalog_core::{
    load_settings, CatalogClient, CatalogController, CatalogSource, DisplaySurface,
    RecordingSurface, ViewMode,
};
use clap::{Parser, ValueEnum};
use shared::domain::SortSelection;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

mod session;
mod terminal;

use terminal::TerminalSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Browse and search a remote product catalog.
#[derive(Parser, Debug)]
#[command(name = "catalog")]
struct Args {
    /// Settings file (defaults to ./catalog.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    list_url: Option<String>,
    #[arg(long)]
    search_url: Option<String>,
    /// Keep server order and disable the sort control
    #[arg(long)]
    plain: bool,
    /// Sort selector value; anything but "low-to-high" sorts descending
    #[arg(long)]
    sort: Option<String>,
    /// Search once and exit
    #[arg(long)]
    query: Option<String>,
    /// Show the listing once and exit
    #[arg(long)]
    once: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(url) = args.list_url {
        settings.list_url = url;
    }
    if let Some(url) = args.search_url {
        settings.search_url = url;
    }
    if args.plain {
        settings.view_mode = ViewMode::Plain;
    }
    if let Some(sort) = args.sort {
        settings.sort_selection = SortSelection::new(sort);
    }
    tracing::debug!(?settings, "settings resolved");

    let source: Arc<dyn CatalogSource> = Arc::new(CatalogClient::new(settings.endpoints()));
    let mut controller =
        CatalogController::new(source, settings.view_mode, settings.sort_selection);

    let one_shot = args.once || args.query.is_some();
    match (one_shot, args.format) {
        (true, OutputFormat::Json) => {
            let mut surface = RecordingSurface::new();
            session::run_once(&mut controller, args.query, &mut surface).await;
            println!("{}", serde_json::to_string_pretty(&surface)?);
        }
        (true, OutputFormat::Text) => {
            let mut surface = TerminalSurface::stdout();
            session::run_once(&mut controller, args.query, &mut surface).await;
        }
        (false, _) => {
            let mut surface = TerminalSurface::stdout();
            surface.show_notice(&session::help_text());
            let input = BufReader::new(tokio::io::stdin());
            session::run_interactive(&mut controller, &mut surface, input).await?;
        }
    }

    Ok(())
}
