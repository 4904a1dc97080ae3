use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::search::{DEFAULT_MAX_GOOGLE, DEFAULT_MAX_LOCAL};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// YAML config file (`base_url`, `token`, `page_size`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print raw JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging for this crate (ignored when RUST_LOG is set).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Books {
        #[command(subcommand)]
        command: BooksCommand,
    },
    Search(SearchArgs),
    Google {
        #[command(subcommand)]
        command: GoogleCommand,
    },
    Home(HomeArgs),
}

#[derive(Debug, Subcommand)]
pub enum BooksCommand {
    /// Public library catalog.
    List(PageArgs),
    /// Books you uploaded (requires login).
    Mine(PageArgs),
    /// Books you are borrowing (requires login).
    Borrowed(PageArgs),
    /// Books you marked as read (requires login).
    Read(PageArgs),
    /// Books you returned (requires login).
    Returned(PageArgs),
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page to show, starting at 1.
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Items per page (default: configured page size).
    #[arg(long)]
    pub size: Option<u32>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Local book id.
    pub id: i64,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Title, author or ISBN.
    pub query: String,

    /// Maximum local library results.
    #[arg(long, default_value_t = DEFAULT_MAX_LOCAL)]
    pub max_local: u32,

    /// Maximum Google Books results.
    #[arg(long, default_value_t = DEFAULT_MAX_GOOGLE)]
    pub max_google: u32,
}

#[derive(Debug, Subcommand)]
pub enum GoogleCommand {
    /// Show one external result.
    Show(GoogleIdArgs),
    /// Import an external result into the library.
    Add(GoogleIdArgs),
}

#[derive(Debug, Args)]
pub struct GoogleIdArgs {
    pub google_id: String,
}

#[derive(Debug, Args)]
pub struct HomeArgs {
    /// Items fetched per list.
    #[arg(long)]
    pub size: Option<u32>,
}
