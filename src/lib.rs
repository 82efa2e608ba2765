//! notehub - a client for a remote notes API with debounced search,
//! cached pagination and validated note creation

pub mod cli;
pub mod domain;
pub mod session;
pub mod transport;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug};

use cli::{
    Cli, Command,
    config::Config,
    handlers::{handle_browse, handle_completions, handle_list, handle_new, handle_rm},
};
use transport::HttpTransport;

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Command::Completions(args) = &cli.command {
        return handle_completions(args, &mut out);
    }

    let config = Config::load(cli.config.as_deref())?;
    let base_url = config.base_url(cli.base_url.as_deref());
    debug!("using API at {}", base_url);
    let transport = HttpTransport::new(base_url, config.token(cli.token.as_deref()), config.timeout())
        .context("failed to set up the API client")?;

    let result = match &cli.command {
        Command::List(args) => handle_list(args, &transport, config.browser_options(args.per_page), &mut out),
        Command::New(args) => handle_new(args, &transport, &mut out),
        Command::Rm(args) => handle_rm(args, &transport, &mut out),
        Command::Browse(args) => handle_browse(&transport, config.browser_options(args.per_page), &mut out),
        Command::Completions(args) => handle_completions(args, &mut out),
    };
    out.flush()?;
    result
}

/// Logs warnings by default; each `-v` raises the level one step.
/// `RUST_LOG`, when set, takes precedence.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp(None);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    // A logger may already be installed when embedded.
    let _ = builder.try_init();
}
