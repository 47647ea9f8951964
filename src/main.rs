use anyhow::Result;
use clap::Parser;

mod app;
mod cli;
mod config;
mod domain;
mod format;
mod logging;
mod store;
mod tui;

use crate::{app::AppContext, cli::args::Cli, config::Config};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env(cli.backend)?;
    logging::init(&config.log_path()?)?;
    tracing::info!(backend = ?config.backend, "memodeck starting");

    let app = AppContext::new(&config)?;
    cli::commands::dispatch(&app, cli)
}
