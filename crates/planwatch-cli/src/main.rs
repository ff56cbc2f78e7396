//! planwatch CLI Application
//!
//! Terminal front-end that chats with a plan-execution backend and follows
//! the resulting plan's progress.

mod args;
mod cli;
mod renderer;

use std::sync::Arc;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use planwatch_core::{ClientBuilder, ClientConfig};
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        config_file,
        host,
        port,
        origin,
        no_color,
        command,
    } = Args::parse();

    let mut config =
        ClientConfig::load(config_file.as_deref()).context("Failed to load configuration")?;
    if let Some(host) = host {
        config.endpoints.host = host;
    }
    if let Some(port) = port {
        config.endpoints.port = port;
    }
    if origin.is_some() {
        config.endpoints.origin = origin;
    }

    let mut renderer = TerminalRenderer::new(!no_color);
    if command.is_none() {
        renderer = renderer.with_prompt();
    }
    let renderer = Arc::new(renderer);

    let client = ClientBuilder::new()
        .with_config(config)
        .build(renderer.clone())
        .context("Failed to initialize client")?;

    info!("planwatch started");

    let cli = Cli::new(client, renderer);
    match command {
        Some(Chat { query }) => cli.chat(&query.join(" ")).await,
        Some(Status) => cli.status().await,
        Some(Watch) => cli.watch().await,
        None => cli.interactive().await,
    }
}
