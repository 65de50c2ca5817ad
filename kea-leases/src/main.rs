use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use kea_leases::filter::FilterSet;
use kea_leases::format::{format_rows, HEADERS};
use kea_leases::render::renderer_for;
use kea_leases::repository::fetch_leases;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let filters = FilterSet::from_args(
        cli.subnet_id,
        cli.ip_address.as_deref(),
        cli.mac_address.as_deref(),
    )
    .context("invalid filter")?;
    if filters.is_empty() {
        debug!("no filters given; listing every lease");
    }

    debug!(config = %cli.config.display(), "loading configuration");
    let loaded = kea_conf::load_file(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    for warning in &loaded.warnings {
        warn!("{warning}");
    }
    let db = loaded
        .lease_database()
        .with_context(|| format!("no usable lease database in {}", cli.config.display()))?;
    debug!(?db, "resolved lease database");

    let rows = fetch_leases(&db, &filters).context("failed to read leases")?;
    let cells = format_rows(&rows);

    // Nothing reaches stdout until every fallible step above has succeeded.
    let color = colored::control::SHOULD_COLORIZE.should_colorize();
    let mut out = io::stdout().lock();
    renderer_for(cli.output.into(), color)
        .render(&HEADERS, &cells, &mut out)
        .context("failed to render leases")?;
    out.flush().context("failed to flush output")?;
    Ok(())
}
