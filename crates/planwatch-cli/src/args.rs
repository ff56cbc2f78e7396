use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Terminal client for a plan-execution backend
///
/// planwatch sends queries to the backend's chat endpoint and, while the
/// backend executes the resulting plan, polls its status endpoint and shows
/// live progress. Without a subcommand it reads queries from stdin, one per
/// line.
#[derive(Parser)]
#[command(version, about, name = "planwatch")]
pub struct Args {
    /// Path to a JSON config file. Defaults to
    /// $XDG_CONFIG_HOME/planwatch/config.json when it exists
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Backend host, overriding the config file
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Backend port, overriding the config file
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Origin the client is served from (e.g. http://console.example.com),
    /// tried after the configured host
    #[arg(long, global = true)]
    pub origin: Option<String>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send one query and follow the plan until polling stops
    #[command(alias = "c")]
    Chat {
        /// The query to send
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Fetch and show the current plan status once
    #[command(alias = "s")]
    Status,
    /// Follow the current plan until it completes or Ctrl-C is pressed
    #[command(alias = "w")]
    Watch,
}
