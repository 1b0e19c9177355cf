mod app;
mod input;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tipdeck_config::{
    ConfigSource, TipdeckConfig, apply_guard_rails, builtin_catalog, load_catalog,
};
use tipdeck_core::{DeckNavigator, DeclaredLengthProbe};
use tipdeck_model::SlideId;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{App, Flow};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "tipdeck")]
#[command(about = "Drive the talk slides and tips carousel from the terminal")]
struct Cli {
    /// Config file (TOML or JSON). Without it `$TIPDECK_CONFIG_PATH`,
    /// `$TIPDECK_CONFIG_JSON` and `tipdeck.toml` are tried in turn.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tips catalog file (overrides config)
    #[arg(long, env = "TIPDECK_CATALOG")]
    catalog: Option<PathBuf>,

    /// Shuffle seed for reproducible rounds (overrides config)
    #[arg(long, env = "TIPDECK_SEED")]
    seed: Option<u64>,

    /// Slide to start on: cover, presenter, features or tips
    #[arg(long)]
    slide: Option<SlideId>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file_loaded = dotenvy::dotenv().is_ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tipdeck_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if env_file_loaded {
        info!("loaded environment from .env");
    }

    let (mut config, source) = match &cli.config {
        Some(path) => (
            TipdeckConfig::load_from_file(path)?,
            ConfigSource::File(path.clone()),
        ),
        None => TipdeckConfig::load_from_env().context("failed to load configuration")?,
    };
    info!(?source, "configuration loaded");

    if let Some(catalog) = cli.catalog {
        config.catalog_path = Some(catalog);
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(slide) = cli.slide {
        config.deck.start_slide = slide;
    }

    let warnings = apply_guard_rails(&config)?;
    for warning in warnings.iter() {
        warn!(hint = %warning.hint, "{}", warning.message);
    }

    let catalog = match &config.catalog_path {
        Some(path) => load_catalog(path)?,
        None => builtin_catalog()?,
    };
    info!(
        items = catalog.len(),
        categories = catalog.categories().len(),
        "tips catalog ready"
    );

    let deck = DeckNavigator::starting_at(config.deck.start_slide, config.deck_settings());
    let mut app = App::new(
        deck,
        Arc::new(catalog),
        config.carousel_settings(),
        config.seed,
        Arc::new(DeclaredLengthProbe),
    );
    app.start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let key = match input::parse(&line) {
            Ok(Some(key)) => key,
            Ok(None) => continue,
            Err(err) => {
                warn!("{err}");
                continue;
            }
        };
        let action = input::route(key, app.current_slide());
        if app.dispatch(action).await? == Flow::Quit {
            break;
        }
    }

    app.shutdown().await?;
    info!("bye");
    Ok(())
}
