//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use output::OutputFormat;

/// notehub - list, search and create notes on a remote notes API
#[derive(Parser, Debug)]
#[command(name = "notehub", version, about, long_about = None)]
pub struct Cli {
    /// Config file (overrides NOTEHUB_CONFIG and the default location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL (overrides config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Bearer token (overrides NOTEHUB_TOKEN and config file)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List notes, optionally filtered by a search term
    #[command(name = "ls")]
    List(ListArgs),

    /// Create a new note
    New(NewArgs),

    /// Delete a note by ID
    Rm(RmArgs),

    /// Interactively search, page through and create notes
    Browse(BrowseArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `ls` (list) command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Search term matched against title and content
    #[arg(short, long)]
    pub search: Option<String>,

    /// Page to show (1-based)
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Notes per page (overrides config file)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub per_page: Option<u32>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `new` command
#[derive(Parser, Debug)]
pub struct NewArgs {
    /// Note title (3-50 characters)
    pub title: String,

    /// Note body (up to 500 characters)
    #[arg(short, long)]
    pub content: Option<String>,

    /// Tag: Todo, Work, Personal, Meeting or Shopping
    #[arg(short, long, default_value = "Todo")]
    pub tag: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `rm` command
#[derive(Parser, Debug)]
pub struct RmArgs {
    /// Note ID
    pub id: String,
}

/// Arguments for the `browse` command
#[derive(Parser, Debug)]
pub struct BrowseArgs {
    /// Notes per page (overrides config file)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub per_page: Option<u32>,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
