//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// devfinder CLI - browse the device catalog and run conversational searches
#[derive(Parser, Debug)]
#[command(name = "devfinder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Backend base URL
    #[arg(long, global = true, env = "DEVFINDER_API_URL")]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true, env = "DEVFINDER_TIMEOUT")]
    pub timeout: Option<u64>,

    /// JSON config file (baseUrl, timeoutMs, skipIdenticalResubmit)
    #[arg(long, global = true, env = "DEVFINDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Session storage identity; each tab keeps its own search session
    #[arg(long, global = true, default_value = "default", env = "DEVFINDER_TAB")]
    pub tab: String,

    /// Directory holding per-tab session storage
    #[arg(long, global = true, env = "DEVFINDER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the device catalog
    List(ListArgs),

    /// Show one device with its match explanation
    Show(ShowArgs),

    /// Run a conversational search
    Search(SearchArgs),

    /// Create a device from a JSON payload file
    Create(CreateArgs),

    /// Update a device from a JSON payload file
    Update(UpdateArgs),

    /// Delete a device
    Delete(DeleteArgs),

    /// Inspect or clear the tab's stored search session
    Session(SessionArgs),

    /// Print the admin analytics payload
    Analytics,
}

// ==================== Catalog ====================

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Force a refresh before listing
    #[arg(short, long)]
    pub refresh: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Device id
    pub id: String,
}

// ==================== Search ====================

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search criterion as TYPE=DESCRIPTION (repeatable, order is kept)
    #[arg(short, long = "criterion", value_name = "TYPE=DESCRIPTION")]
    pub criteria: Vec<String>,

    /// Free-text console input
    #[arg(long)]
    pub console: Option<String>,

    #[command(flatten)]
    pub selectors: SelectorArgs,

    /// Ignore the console input and selectors stored for this tab
    #[arg(long)]
    pub fresh: bool,

    /// Answer follow-up questions on stdin until results arrive
    #[arg(short, long)]
    pub interactive: bool,
}

/// Selector facets; an empty value clears a stored one.
#[derive(Args, Debug, Default)]
pub struct SelectorArgs {
    #[arg(long)]
    pub ram: Option<String>,

    /// Internal storage (ROM)
    #[arg(long, alias = "storage")]
    pub rom: Option<String>,

    #[arg(long)]
    pub battery: Option<String>,

    #[arg(long)]
    pub camera: Option<String>,

    #[arg(long)]
    pub benchmark: Option<String>,

    #[arg(long)]
    pub price_range: Option<String>,
}

// ==================== Admin ====================

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// JSON file with title, images, specs, price
    #[arg(short, long)]
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Device id
    pub id: String,

    /// JSON file with title, images, specs, price
    #[arg(short, long)]
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Device id
    pub id: String,

    /// Show the device before deleting it
    #[arg(long)]
    pub show: bool,
}

// ==================== Session ====================

#[derive(Args, Debug)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommands,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommands {
    /// Show the session as restored for this tab
    Show,

    /// Purge the tab's stored session
    Clear,
}
